//! Prompts and response schemas for letter analysis.

use super::category::LetterCategory;
use super::metadata::{DocumentMetadata, LetterMetadata};
use crate::llm::Schema;

/// Prompt for a one-sentence summary. Uses the `{content}` placeholder.
pub const SUMMARY_PROMPT: &str = "Ringkaslah isi surat berikut ini menjadi satu kalimat yang padat dan informatif dalam Bahasa Indonesia: \n\n {content}";

/// Prompt for metadata extraction from text. Uses `{categories}` and `{content}`.
pub const METADATA_PROMPT: &str = r#"Ekstrak informasi penting dari teks surat berikut dalam format JSON. Field yang dibutuhkan:
- number (nomor surat)
- sender (pengirim)
- receiver (penerima)
- title (perihal/judul singkat)
- category (pilih satu: {categories})

Teks surat:
{content}"#;

/// Instruction sent alongside a scanned document. Uses `{categories}`.
pub const DOCUMENT_PROMPT: &str = r#"Anda adalah asisten kearsipan digital profesional. Analisis dokumen/gambar surat ini dan ekstrak informasi berikut dalam format JSON:
- number: nomor surat resmi (jika tidak ditemukan, biarkan kosong)
- title: perihal atau judul surat yang sangat ringkas
- sender: nama instansi atau orang pengirim
- receiver: nama instansi atau orang penerima
- date: tanggal surat dalam format YYYY-MM-DD
- category: pilih satu yang paling cocok ({categories})
- content: transkrip lengkap teks yang ada dalam surat

PENTING: Berikan hasil hanya dalam format JSON yang valid."#;

pub fn summary_prompt(content: &str) -> String {
    SUMMARY_PROMPT.replace("{content}", content)
}

pub fn metadata_prompt(content: &str) -> String {
    METADATA_PROMPT
        .replace("{categories}", &LetterCategory::prompt_list())
        .replace("{content}", content)
}

pub fn document_prompt() -> String {
    let names: Vec<&str> = LetterCategory::ALL.iter().map(|c| c.as_str()).collect();
    // "A, B, ..., F, atau G"
    let list = match names.split_last() {
        Some((last, rest)) => format!("{}, atau {}", rest.join(", "), last),
        None => String::new(),
    };
    DOCUMENT_PROMPT.replace("{categories}", &list)
}

/// Schema for text extraction: five string fields, all required.
pub fn metadata_schema() -> Schema {
    Schema::string_object(&LetterMetadata::FIELDS).with_required(&LetterMetadata::FIELDS)
}

/// Schema for document extraction: seven string fields, none required.
pub fn document_schema() -> Schema {
    Schema::string_object(&DocumentMetadata::FIELDS)
}

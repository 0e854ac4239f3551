use thiserror::Error;

/// Errors raised while reading or writing a DOCX package.
///
/// Only structurally broken input ends up here. Missing styles, missing
/// markers and malformed emails are recovered where they occur.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("part is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("missing package part: {0}")]
    MissingPart(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

pub type DocxResult<T> = std::result::Result<T, DocxError>;

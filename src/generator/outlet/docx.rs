//! 最小化的WordprocessingML（.docx）写入器，每行文本对应一个段落

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// 纯文本段落文档
#[derive(Debug, Clone, PartialEq)]
pub struct DocxDocument {
    title: String,
    created: DateTime<Utc>,
    paragraphs: Vec<String>,
}

impl DocxDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created: Utc::now(),
            paragraphs: Vec::new(),
        }
    }

    /// 按`\n`拆分文本，每行追加为一个段落（保留空行，不做markdown转换）
    pub fn from_plain_text(title: impl Into<String>, text: &str) -> Self {
        let mut document = Self::new(title);
        for line in text.split('\n') {
            document.add_paragraph(line);
        }
        document
    }

    pub fn add_paragraph(&mut self, text: &str) {
        let text = text.strip_suffix('\r').unwrap_or(text);
        self.paragraphs.push(text.to_string());
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// 生成 word/document.xml
    pub fn document_xml(&self) -> String {
        let mut body = String::new();
        for paragraph in &self.paragraphs {
            if paragraph.is_empty() {
                body.push_str("<w:p/>");
            } else {
                body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
                body.push_str(&escape_xml(paragraph));
                body.push_str("</w:t></w:r></w:p>");
            }
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}<w:sectPr/></w:body></w:document>",
            body
        )
    }

    fn core_xml(&self) -> String {
        let created = self.created.to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"><dc:title>{}</dc:title><dc:creator>blogwright</dc:creator><dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created><dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified></cp:coreProperties>",
            escape_xml(&self.title),
            created,
            created
        )
    }

    /// 打包为.docx字节
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", ROOT_RELS_XML.to_string()),
            ("docProps/core.xml", self.core_xml()),
            ("word/document.xml", self.document_xml()),
        ];

        for (name, content) in parts {
            zip.start_file(name, options)
                .with_context(|| format!("Failed to add {} to docx", name))?;
            zip.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write {}", name))?;
        }

        let cursor = zip.finish().context("Failed to finish docx archive")?;
        Ok(cursor.into_inner())
    }
}

/// XML转义，并移除XML 1.0中不允许出现的控制字符
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

use anyhow::{Context, Result};
use base64::Engine;
use std::io::Write;
use std::path::PathBuf;

use crate::config::ExportConfig;
use crate::generator::pipeline::BlogDraft;

pub mod docx;

pub use docx::{DOCX_MIME, DocxDocument};

/// 导出后的文档
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// 临时文件路径（交由系统临时目录管理，不主动删除）
    pub path: PathBuf,
    /// 下载文件名
    pub file_name: String,
    pub paragraph_count: usize,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// 生成可直接用于下载链接的data URI
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            DOCX_MIME,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

#[allow(async_fn_in_trait)]
pub trait Outlet {
    async fn save(&self, draft: &BlogDraft) -> Result<ExportedDocument>;
}

/// 将写作任务的输出逐行导出为Word文档，保存到临时文件
pub struct DocxOutlet {
    export: ExportConfig,
    temp_prefix: String,
}

impl DocxOutlet {
    pub fn new(export: ExportConfig) -> Self {
        Self {
            export,
            temp_prefix: String::from("blogwright-"),
        }
    }

    /// 临时文件名前缀，便于按运行区分
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }
}

impl Outlet for DocxOutlet {
    async fn save(&self, draft: &BlogDraft) -> Result<ExportedDocument> {
        let document = DocxDocument::from_plain_text(&draft.topic, &draft.post);
        let bytes = document.to_bytes()?;

        let mut temp_file = tempfile::Builder::new()
            .prefix(&self.temp_prefix)
            .suffix(".docx")
            .tempfile()
            .context("Failed to create temporary docx file")?;
        temp_file
            .write_all(&bytes)
            .context("Failed to write temporary docx file")?;
        let (_file, path) = temp_file
            .keep()
            .context("Failed to keep temporary docx file")?;

        tracing::info!(
            path = %path.display(),
            paragraphs = document.paragraph_count(),
            "docx exported"
        );

        Ok(ExportedDocument {
            path,
            file_name: self.export.file_name.clone(),
            paragraph_count: document.paragraph_count(),
            bytes,
        })
    }
}

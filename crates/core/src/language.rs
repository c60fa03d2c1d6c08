use serde::Serialize;

use crate::path;

/// 編輯區使用的語言提示。 / Language hint passed to the text-rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Json,
    Css,
    Html,
    PlainText,
}

impl Language {
    /// 依檔名字尾推斷語言；未知字尾視為純文字。 / Derives the hint from the file suffix.
    pub fn from_path(file: &str) -> Self {
        match path::extension(file) {
            Some("ts" | "tsx") => Language::TypeScript,
            Some("js" | "jsx") => Language::JavaScript,
            Some("json") => Language::Json,
            Some("css") => Language::Css,
            Some("html") => Language::Html,
            _ => Language::PlainText,
        }
    }

    /// 編輯元件所識別的語言代號。 / Identifier understood by the editing surface.
    pub fn id(self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Json => "json",
            Language::Css => "css",
            Language::Html => "html",
            Language::PlainText => "plaintext",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

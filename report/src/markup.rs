use quick_xml::escape::escape;

const CODE_BLOCK_OPEN: &str = r#"<textarea readonly class="code-block">"#;
const CODE_BLOCK_CLOSE: &str = "</textarea>";

/// Preformatted text, rendered verbatim by report viewers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    code: String,
}

impl CodeBlock {
    pub fn new<T: Into<String>>(code: T) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn markup(&self) -> String {
        format!("{}{}{}", CODE_BLOCK_OPEN, escape(&self.code), CODE_BLOCK_CLOSE)
    }
}

// ABOUTME: Rendered Markdown contract for assistant messages
// ABOUTME: Fenced code block extraction and the language alias table for highlighting

use crate::types::CodeBlock;

/// Grammar used when a fence has no tag or an unknown one
pub const DEFAULT_GRAMMAR: &str = "text";

/// Grammars the highlighter understands
const GRAMMARS: &[&str] = &[
    "text",
    "python",
    "shell",
    "javascript",
    "typescript",
    "jsx",
    "tsx",
    "rust",
    "json",
    "toml",
    "yaml",
    "markdown",
    "html",
    "css",
    "sql",
    "go",
];

/// Alias → grammar. Tags that already name a grammar need no entry.
const ALIASES: &[(&str, &str)] = &[
    ("py", "python"),
    ("python3", "python"),
    ("sh", "shell"),
    ("bash", "shell"),
    ("zsh", "shell"),
    ("console", "shell"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("rs", "rust"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("htm", "html"),
    ("golang", "go"),
    ("plaintext", "text"),
    ("txt", "text"),
];

/// Map a fence language tag to a supported grammar, defaulting to `text`.
pub fn resolve_language(tag: &str) -> &'static str {
    let tag = tag.trim().to_ascii_lowercase();
    if let Some(grammar) = GRAMMARS.iter().find(|g| **g == tag) {
        return *grammar;
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == tag)
        .map(|(_, grammar)| *grammar)
        .unwrap_or(DEFAULT_GRAMMAR)
}

/// A piece of message content: prose or a fenced block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    Code(CodeBlock),
}

fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Split content into prose and fenced code segments, in order.
/// An unterminated fence (common mid-stream) runs to the end of the content.
pub fn segments(content: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut prose_start = 0;
    let mut offset = 0;
    let mut open: Option<(&'static str, CodeBlock, Vec<&str>)> = None;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let bare = line.trim_end_matches(['\n', '\r']);

        match open.take() {
            Some((marker, mut block, mut body)) => {
                if bare.trim() == marker {
                    block.code = body.join("\n");
                    out.push(Segment::Code(block));
                    prose_start = offset;
                } else {
                    body.push(bare);
                    open = Some((marker, block, body));
                }
            }
            None => {
                if let Some(marker) = fence_marker(bare) {
                    if line_start > prose_start {
                        out.push(Segment::Prose(&content[prose_start..line_start]));
                    }
                    let info = bare.trim_start()[marker.len()..].trim();
                    let mut words = info.split_whitespace();
                    let language = resolve_language(words.next().unwrap_or("")).to_string();
                    let filename = words.next().map(str::to_string);
                    open = Some((
                        marker,
                        CodeBlock {
                            language,
                            filename,
                            code: String::new(),
                        },
                        Vec::new(),
                    ));
                }
            }
        }
    }

    if let Some((_, mut block, body)) = open {
        block.code = body.join("\n");
        out.push(Segment::Code(block));
    } else if prose_start < content.len() {
        out.push(Segment::Prose(&content[prose_start..]));
    }

    out
}

/// All fenced code blocks in `content`, in order
pub fn extract_code_blocks(content: &str) -> Vec<CodeBlock> {
    segments(content)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Code(block) => Some(block),
            Segment::Prose(_) => None,
        })
        .collect()
}

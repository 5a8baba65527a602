/// A passage cut from a reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub content: String,
    pub section_title: Option<String>,
}

/// Splits guideline documents into passages: by Markdown heading first,
/// then by paragraph, with overly long paragraphs cut at sentence ends.
pub struct PassageChunker {
    max_chunk_chars: usize,
    min_chunk_chars: usize,
}

impl PassageChunker {
    pub fn new() -> Self {
        Self {
            max_chunk_chars: 600,
            min_chunk_chars: 40,
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();

        for section in split_by_headings(text) {
            let mut current = String::new();
            for para in section.content.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
                if para.len() > self.max_chunk_chars {
                    flush(&mut chunks, &mut current, &section.title);
                    for piece in split_long_paragraph(para, self.max_chunk_chars) {
                        chunks.push(TextChunk {
                            content: piece,
                            section_title: section.title.clone(),
                        });
                    }
                    continue;
                }
                if !current.is_empty() && current.len() + para.len() + 1 > self.max_chunk_chars {
                    flush(&mut chunks, &mut current, &section.title);
                }
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(para);
                // Short paragraphs accumulate until they are worth a passage.
                if current.len() >= self.min_chunk_chars {
                    flush(&mut chunks, &mut current, &section.title);
                }
            }
            flush(&mut chunks, &mut current, &section.title);
        }

        chunks
    }
}

impl Default for PassageChunker {
    fn default() -> Self {
        Self::new()
    }
}

fn flush(chunks: &mut Vec<TextChunk>, current: &mut String, title: &Option<String>) {
    let content = current.trim();
    if !content.is_empty() {
        chunks.push(TextChunk {
            content: content.to_string(),
            section_title: title.clone(),
        });
    }
    current.clear();
}

struct Section {
    title: Option<String>,
    content: String,
}

fn split_by_headings(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut title: Option<String> = None;
    let mut content = String::new();

    for line in text.lines() {
        if line.starts_with('#') {
            if !content.trim().is_empty() {
                sections.push(Section {
                    title: title.take(),
                    content: std::mem::take(&mut content),
                });
            }
            title = Some(line.trim_start_matches('#').trim().to_string());
            content.clear();
        } else {
            content.push_str(line);
            content.push('\n');
        }
    }

    if !content.trim().is_empty() {
        sections.push(Section { title, content });
    }

    sections
}

/// Cut at ". " within the last fifth of each window when possible.
fn split_long_paragraph(para: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < para.len() {
        let mut end = (start + max_chars).min(para.len());
        while !para.is_char_boundary(end) {
            end -= 1;
        }

        let break_at = if end < para.len() {
            let mut search_start = start + (max_chars * 4 / 5);
            while !para.is_char_boundary(search_start) {
                search_start -= 1;
            }
            para[search_start..end]
                .rfind(". ")
                .map(|pos| search_start + pos + 2)
                .unwrap_or(end)
        } else {
            end
        };

        let piece = para[start..break_at].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        if break_at <= start {
            break;
        }
        start = break_at;
    }

    pieces
}

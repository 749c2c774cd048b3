// src/markdown/mod.rs
use crate::site::models::{bare_name, display_path, ContentBlock, Tutorial};

/// Renders a tutorial as Markdown. Blocks with empty text are skipped;
/// lists and images are always written.
pub fn render(tutorial: &Tutorial) -> String {
    let mut out = String::new();

    // Title/link
    let title = &tutorial.title;
    out.push_str(&format!("{}\n{}\n", title, underline('=', title)));
    out.push_str(&format!("\nLink: {}", tutorial.url));

    for block in &tutorial.content {
        render_block(&mut out, block);
    }

    out
}

fn render_block(out: &mut String, block: &ContentBlock) {
    match block {
        ContentBlock::BigHeader { text } if !text.is_empty() => {
            out.push_str(&format!("\n\n{}\n{}\n", text, underline('-', text)));
        }
        ContentBlock::Header { text } if !text.is_empty() => out.push_str(&format!("\n\n### {}\n", text)),
        ContentBlock::SubHeader { text } if !text.is_empty() => out.push_str(&format!("\n##### {}\n", text)),
        ContentBlock::List { items } => {
            out.push('\n');
            for item in items {
                out.push_str(&format!("- {}\n", item));
            }
        }
        ContentBlock::Text { text } if !text.is_empty() => out.push_str(&format!("\n{}\n", text)),
        ContentBlock::Code { text } if !text.is_empty() => out.push_str(&format!("\n```\n{}\n```\n", text)),
        ContentBlock::Image { src, .. } => {
            let src = src.as_deref().unwrap_or_default();
            out.push_str(&format!("\n![{}]({})\n", bare_name(src), display_path(src)));
        }
        _ => {}
    }
}

fn underline(ch: char, text: &str) -> String {
    std::iter::repeat(ch).take(text.chars().count()).collect()
}

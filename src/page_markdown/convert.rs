//! HTML → markdown conversion.
//!
//! Each element maps to a markdown fragment. Block elements are surrounded by
//! blank lines; inline elements return inline text. Runs of blank lines and
//! stray spaces at block edges are cleaned up by
//! [`normalize_output`](super::normalize_output).
//!
//! Site-specific rules:
//!
//! | Element | Markdown |
//! |---|---|
//! | `a` | `[label](absolute-href)`, or the href alone with no label |
//! | `img` | `![alt](absolute-src)` using `src` or `data-src` |
//! | `video` | `[Video](src)`, `[Video source](src)` per `<source>`, `![Video poster](poster)` |
//! | `iframe` | `[Embedded content: title](src)` |
//! | `button` | `**Button:** label` |
//! | `input`, `textarea`, `select` | `**Field:** label` |

use super::prune::is_skipped;
use super::urls::{media_source, to_absolute_url, video_sources};
use scraper::{ElementRef, Node};
use url::Url;

const BLOCK_TAGS: [&str; 21] = [
    "address", "article", "aside", "body", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "header", "html", "main", "nav", "p", "section",
    "summary",
];

/// Collapse whitespace runs to single spaces and trim.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace runs to a single space, keeping edge spaces.
fn collapse_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Backslash-escape characters that would otherwise read as markdown syntax.
///
/// With `line_start`, constructs that only matter at the start of a line
/// (`- `, `# `, `1. `, `>`) are escaped too. They are checked after leading
/// whitespace, which block assembly trims away.
pub(crate) fn escape_markdown(text: &str, line_start: bool) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '`' | '[' | ']' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    if !line_start {
        return out;
    }

    let lead = out.len() - out.trim_start().len();
    let rest = &out[lead..];
    let needs_prefix = rest.starts_with('-')
        || rest.starts_with("+ ")
        || rest.starts_with('=')
        || rest.starts_with('>')
        || rest.starts_with("~~~")
        || atx_prefix(rest);
    if needs_prefix {
        out.insert(lead, '\\');
        return out;
    }

    // `1. ` → `1\. `
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && rest[digits..].starts_with(". ") {
        out.insert(lead + digits, '\\');
    }
    out
}

fn atx_prefix(text: &str) -> bool {
    let hashes = text.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes) && text[hashes..].starts_with(' ')
}

/// Wrap `inner` in `marker`, keeping its edge whitespace outside the markers.
fn wrap_inline(inner: &str, marker: &str) -> String {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return inner.to_string();
    }
    let lead = if inner.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if inner.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{lead}{marker}{trimmed}{marker}{trail}")
}

fn block(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n\n{trimmed}\n\n")
    }
}

/// Indent every line after the first by `width` spaces.
fn indent_continuation(content: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    content.replace('\n', &format!("\n{pad}"))
}

/// Raw text content of an element, skipping pruned subtrees.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if is_skipped(element.value()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text(el, out);
                }
            }
            _ => {}
        }
    }
}

/// Converts an element subtree to markdown with URLs resolved against `base`.
pub struct MarkdownConverter<'a> {
    base: &'a Url,
}

impl<'a> MarkdownConverter<'a> {
    pub fn new(base: &'a Url) -> Self {
        Self { base }
    }

    /// Markdown for the children of `root`.
    pub fn convert(&self, root: ElementRef<'_>) -> String {
        if is_skipped(root.value()) {
            return String::new();
        }
        self.children(root)
    }

    fn children(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let line_start = out.trim_start_matches(' ').is_empty() || out.ends_with('\n');
                    out.push_str(&escape_markdown(&collapse_inline(text), line_start));
                }
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        out.push_str(&self.element(el));
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn element(&self, element: ElementRef<'_>) -> String {
        let el = element.value();
        if is_skipped(el) {
            return String::new();
        }
        let name = el.name();
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                let text = normalize_whitespace(&self.children(element));
                if text.is_empty() {
                    String::new()
                } else {
                    format!("\n\n{} {text}\n\n", "#".repeat(level))
                }
            }
            "br" => "\n".to_string(),
            "hr" => "\n\n---\n\n".to_string(),
            "strong" | "b" => wrap_inline(&self.children(element), "**"),
            "em" | "i" => wrap_inline(&self.children(element), "*"),
            "code" => self.inline_code(element),
            "pre" => self.code_block(element),
            "ul" | "ol" => self.list(element, name == "ol"),
            "li" => block(&format!("- {}", self.children(element).trim())),
            "blockquote" => self.blockquote(element),
            "table" => self.table(element),
            "a" => self.link(element),
            "img" => self.image(element),
            "video" => self.video(element),
            "iframe" => self.iframe(element),
            "button" => self.button(element),
            "input" | "textarea" | "select" => self.field(element),
            "head" | "title" | "meta" | "link" | "base" => String::new(),
            _ if BLOCK_TAGS.contains(&name) => block(&self.children(element)),
            _ => self.children(element),
        }
    }

    fn inline_code(&self, element: ElementRef<'_>) -> String {
        let code = visible_text(element);
        if code.is_empty() {
            return String::new();
        }
        if code.contains('`') {
            format!("`` {code} ``")
        } else {
            format!("`{code}`")
        }
    }

    fn code_block(&self, element: ElementRef<'_>) -> String {
        let code = visible_text(element);
        let code = code.trim_end_matches('\n');
        if code.trim().is_empty() {
            return String::new();
        }
        let language = element
            .children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == "code")
            .and_then(|code| {
                code.value()
                    .classes()
                    .find_map(|class| class.strip_prefix("language-"))
                    .map(str::to_string)
            })
            .unwrap_or_default();
        format!("\n\n```{language}\n{code}\n```\n\n")
    }

    fn list(&self, element: ElementRef<'_>, ordered: bool) -> String {
        let start = element
            .value()
            .attr("start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);
        let items: Vec<String> = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "li" && !is_skipped(child.value()))
            .enumerate()
            .map(|(index, item)| {
                let marker = if ordered {
                    format!("{}. ", start + index)
                } else {
                    "- ".to_string()
                };
                let content = self.children(item);
                format!("{marker}{}", indent_continuation(content.trim(), 4))
            })
            .collect();
        block(&items.join("\n"))
    }

    fn blockquote(&self, element: ElementRef<'_>) -> String {
        let content = self.children(element);
        let mut quoted: Vec<String> = Vec::new();
        for line in content.trim().lines().map(str::trim_end) {
            if line.is_empty() {
                if quoted.last().is_some_and(|prev| prev == ">") {
                    continue;
                }
                quoted.push(">".to_string());
            } else {
                quoted.push(format!("> {line}"));
            }
        }
        block(&quoted.join("\n"))
    }

    fn table(&self, element: ElementRef<'_>) -> String {
        let rows: Vec<String> = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr" && !is_skipped(el.value()))
            .map(|row| {
                row.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                    .map(|cell| normalize_whitespace(&self.children(cell)))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .filter(|row| !row.trim().is_empty())
            .collect();
        block(&rows.join("\n"))
    }

    fn link(&self, element: ElementRef<'_>) -> String {
        let href = to_absolute_url(element.value().attr("href"), self.base);
        let mut label = normalize_whitespace(&self.children(element));
        if label.is_empty() {
            label = normalize_whitespace(&visible_text(element));
        }
        match href {
            None => label,
            Some(href) if label.is_empty() => href,
            Some(href) => format!("[{label}]({href})"),
        }
    }

    fn image(&self, element: ElementRef<'_>) -> String {
        let Some(src) = media_source(element, self.base) else {
            return String::new();
        };
        let alt = normalize_whitespace(element.value().attr("alt").unwrap_or_default());
        format!("![{alt}]({src})")
    }

    fn video(&self, element: ElementRef<'_>) -> String {
        let mut links = Vec::new();
        if let Some(src) = media_source(element, self.base) {
            links.push(format!("[Video]({src})"));
        }
        for source in video_sources(element, self.base) {
            links.push(format!("[Video source]({source})"));
        }
        if let Some(poster) = to_absolute_url(element.value().attr("poster"), self.base) {
            links.push(format!("![Video poster]({poster})"));
        }
        if links.is_empty() {
            "\n\n".to_string()
        } else {
            format!("\n\n{}\n\n", links.join("\n"))
        }
    }

    fn iframe(&self, element: ElementRef<'_>) -> String {
        let Some(src) = media_source(element, self.base) else {
            return String::new();
        };
        let title = normalize_whitespace(element.value().attr("title").unwrap_or_default());
        let title = if title.is_empty() {
            "Embedded content".to_string()
        } else {
            title
        };
        format!("\n\n[Embedded content: {title}]({src})\n\n")
    }

    fn button(&self, element: ElementRef<'_>) -> String {
        let el = element.value();
        let label = [
            Some(self.children(element)),
            el.attr("aria-label").map(str::to_string),
            el.attr("title").map(str::to_string),
        ]
        .into_iter()
        .flatten()
        .map(|candidate| normalize_whitespace(&candidate))
        .find(|candidate| !candidate.is_empty());
        match label {
            Some(label) => format!("\n\n**Button:** {label}\n\n"),
            None => String::new(),
        }
    }

    fn field(&self, element: ElementRef<'_>) -> String {
        let el = element.value();
        let label = ["aria-label", "placeholder", "name"]
            .into_iter()
            .filter_map(|attr| el.attr(attr))
            .map(normalize_whitespace)
            .find(|candidate| !candidate.is_empty());
        match label {
            Some(label) => format!("\n\n**Field:** {label}\n\n"),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::normalize_output;
    use super::*;
    use scraper::Html;

    fn md(body: &str) -> String {
        let base = Url::parse("https://www.design-prism.com/about").unwrap();
        let doc = Html::parse_document(&format!("<html><body>{body}</body></html>"));
        let root = doc
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .unwrap();
        normalize_output(&MarkdownConverter::new(&base).convert(root))
    }

    #[test]
    fn headings_and_paragraphs() {
        assert_eq!(
            md("<h1>About</h1>\n  <p>\n  We design   growth systems.\n</p>"),
            "# About\n\nWe design growth systems."
        );
    }

    #[test]
    fn links_are_absolute() {
        assert_eq!(
            md(r#"<p>Read <a href="/contact">Contact us</a> now.</p>"#),
            "Read [Contact us](https://www.design-prism.com/contact) now."
        );
    }

    #[test]
    fn link_without_label_is_bare_href() {
        assert_eq!(
            md(r#"<a href="/x"></a>"#),
            "https://www.design-prism.com/x"
        );
    }

    #[test]
    fn link_without_resolvable_href_keeps_label() {
        assert_eq!(md(r#"<a href="javascript:void(0)">Open menu</a>"#), "Open menu");
    }

    #[test]
    fn images_use_data_src_and_alt() {
        assert_eq!(
            md(r#"<img data-src="/lazy.png" alt=" Team  photo ">"#),
            "![Team photo](https://www.design-prism.com/lazy.png)"
        );
        assert_eq!(md(r#"<img src="/a.png">"#), "![](https://www.design-prism.com/a.png)");
        assert_eq!(md(r#"<img alt="nothing">"#), "");
    }

    #[test]
    fn video_block() {
        assert_eq!(
            md(r#"<video src="/v.mp4" poster="/p.jpg"><source src="/v.webm"><source src="/v.ogv"></video>"#),
            "[Video](https://www.design-prism.com/v.mp4)\n\
             [Video source](https://www.design-prism.com/v.webm)\n\
             [Video source](https://www.design-prism.com/v.ogv)\n\
             ![Video poster](https://www.design-prism.com/p.jpg)"
        );
    }

    #[test]
    fn iframe_title_defaults() {
        assert_eq!(
            md(r#"<iframe src="https://www.youtube.com/embed/abc"></iframe>"#),
            "[Embedded content: Embedded content](https://www.youtube.com/embed/abc)"
        );
    }

    #[test]
    fn buttons_and_fields() {
        assert_eq!(
            md(r#"<form><input name="email" placeholder="Your email"><textarea aria-label="Message"></textarea><button>Send  it</button><button aria-label="Close"></button></form>"#),
            "**Field:** Your email\n\n**Field:** Message\n\n**Button:** Send it\n\n**Button:** Close"
        );
    }

    #[test]
    fn lists_and_emphasis() {
        assert_eq!(
            md("<ul><li><strong>Fast</strong> sites</li><li><em>Local</em> SEO</li></ul><ol start=\"3\"><li>Three</li></ol>"),
            "- **Fast** sites\n- *Local* SEO\n\n3. Three"
        );
    }

    #[test]
    fn nested_lists_are_indented() {
        assert_eq!(
            md("<ul><li>Parent<ul><li>Child</li></ul></li></ul>"),
            "- Parent\n\n    - Child"
        );
    }

    #[test]
    fn code_is_not_escaped() {
        assert_eq!(
            md(r#"<p>Run <code>make_site *</code></p><pre><code class="language-sh">npm run build
</code></pre>"#),
            "Run `make_site *`\n\n```sh\nnpm run build\n```"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(md("<p>5 * 3 = [fifteen]</p>"), "5 \\* 3 = \\[fifteen\\]");
        assert_eq!(md("<p># not a heading</p>"), "\\# not a heading");
        assert_eq!(md("<p>1. not a list</p>"), "1\\. not a list");
    }

    #[test]
    fn line_start_escaping_sees_past_leading_whitespace() {
        assert_eq!(
            md("<p>\n  - not a list item</p><p>\n # not a heading</p>"),
            "\\- not a list item\n\n\\# not a heading"
        );
        assert_eq!(md("<p>\n 2. not a list</p>"), "2\\. not a list");
        assert_eq!(md("<p>Line<br>\n> not a quote</p>"), "Line\n\\> not a quote");
    }

    #[test]
    fn mid_line_dashes_are_left_alone() {
        assert_eq!(md("<p><strong>Fast</strong> - sites</p>"), "**Fast** - sites");
    }

    #[test]
    fn blockquotes() {
        assert_eq!(md("<blockquote><p>One</p><p>Two</p></blockquote>"), "> One\n>\n> Two");
    }

    #[test]
    fn skipped_content_is_dropped() {
        assert_eq!(
            md(r#"<p>Visible</p><script>track()</script><p class="sr-only">Skip</p><div aria-hidden="true">Deco</div>"#),
            "Visible"
        );
    }

    #[test]
    fn tables_render_rows() {
        assert_eq!(
            md("<table><tr><th>Plan</th><th>Price</th></tr><tr><td>Starter</td><td>$99</td></tr></table>"),
            "Plan | Price\nStarter | $99"
        );
    }
}

//! Table-of-contents markup for blog post pages.

use super::backend::{HeadingLevel, TocItem};
use maud::{Markup, html};

/// An `h2` entry with the `h3` entries that follow it.
struct Section<'a> {
    item: &'a TocItem,
    children: Vec<&'a TocItem>,
}

/// Group `h3` entries under the preceding `h2`. An `h3` with no `h2` before it
/// becomes a top-level section of its own.
fn group_sections(items: &[TocItem]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section> = Vec::new();
    for item in items {
        match (item.level, sections.last_mut()) {
            (HeadingLevel::H3, Some(section)) if section.item.level == HeadingLevel::H2 => {
                section.children.push(item);
            }
            _ => sections.push(Section {
                item,
                children: Vec::new(),
            }),
        }
    }
    sections
}

fn level_class(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H2 => "toc-h2",
        HeadingLevel::H3 => "toc-h3",
    }
}

/// Renders the `<nav class="toc">` sidebar. Empty input renders nothing.
pub fn render_toc_nav(items: &[TocItem]) -> Markup {
    html! {
        @if !items.is_empty() {
            nav.toc aria-label="Table of contents" {
                ol {
                    @for section in group_sections(items) {
                        li class=(level_class(section.item.level)) {
                            a href={ "#" (section.item.id) } { (section.item.label) }
                            @if !section.children.is_empty() {
                                ol {
                                    @for child in &section.children {
                                        li.toc-h3 {
                                            a href={ "#" (child.id) } { (child.label) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

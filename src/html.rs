use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesText, Event};

// Section extraction over Bookshelf article markup. A section is the run of
// sibling elements after a matching h2/h3/h4, up to the next sibling heading.
// Only p/ul/ol siblings contribute text; the walk never errors, malformed
// markup just ends it early with whatever was collected.
pub fn extract_section(html: &str, label: &str) -> String {
    let html = presanitize(html);

    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut walk = SectionWalk::new(label);
    let mut buf = Vec::new();

    loop {
        let stop = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => walk.open(&tag_name(e.name().as_ref())),
            Ok(Event::Empty(e)) => walk.open_empty(&tag_name(e.name().as_ref())),
            Ok(Event::Text(e)) => {
                walk.text(&decode_text(&e));
                false
            }
            Ok(Event::End(e)) => walk.close(&tag_name(e.name().as_ref())),
            Ok(Event::Eof) => true,
            Err(err) => {
                tracing::debug!("markup walk aborted: {err}");
                true
            }
            _ => false,
        };
        if stop {
            break;
        }
        buf.clear();
    }

    walk.finish()
}

// Tracks the open non-void elements by name; an element's depth is the stack
// length before its own push. HTML5 leaves </p> and </li> optional, so the
// walk synthesizes those ends when a sibling or block-level start implies
// them, keeping sibling depths honest across bled markup.
struct SectionWalk {
    label: String,
    stack: Vec<String>,
    in_heading: bool,
    heading_depth: usize,
    heading_text: String,
    in_section: bool,
    section_depth: usize,
    in_block: bool,
    block_depth: usize,
    fragments: Vec<String>,
    blocks: Vec<String>,
}

impl SectionWalk {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_lowercase(),
            stack: Vec::new(),
            in_heading: false,
            heading_depth: 0,
            heading_text: String::new(),
            in_section: false,
            section_depth: 0,
            in_block: false,
            block_depth: 0,
            fragments: Vec::new(),
            blocks: Vec::new(),
        }
    }

    // Each method returns true when the walk is done.
    fn open(&mut self, name: &str) -> bool {
        if self.pop_implied(name) {
            return true;
        }
        if is_void(name) {
            return false;
        }
        let element_depth = self.stack.len();
        self.stack.push(name.to_string());

        if self.in_section {
            if element_depth == self.section_depth {
                if is_heading(name) {
                    return true;
                }
                if is_content_block(name) {
                    self.in_block = true;
                    self.block_depth = element_depth;
                    self.fragments.clear();
                }
            }
        } else if !self.in_heading && is_heading(name) {
            self.in_heading = true;
            self.heading_depth = element_depth;
            self.heading_text.clear();
        }
        false
    }

    // Self-closed elements never open a subtree; only a heading among the
    // walked siblings is significant.
    fn open_empty(&mut self, name: &str) -> bool {
        if self.pop_implied(name) {
            return true;
        }
        self.in_section && self.stack.len() == self.section_depth && is_heading(name)
    }

    fn text(&mut self, text: &str) {
        if self.in_heading {
            if !self.heading_text.is_empty() {
                self.heading_text.push(' ');
            }
            self.heading_text.push_str(text);
        } else if self.in_block {
            self.fragments.push(text.to_string());
        }
    }

    fn close(&mut self, name: &str) -> bool {
        if is_void(name) || !self.stack.iter().any(|open| open == name) {
            return false;
        }
        // Pop through still-open children; their ends were implied.
        loop {
            let popped = self.stack.pop();
            if self.popped_one() {
                return true;
            }
            if popped.as_deref() == Some(name) {
                return false;
            }
        }
    }

    fn pop_implied(&mut self, incoming: &str) -> bool {
        loop {
            let implied = match self.stack.last().map(String::as_str) {
                Some("p") => closes_p(incoming),
                Some("li") => incoming == "li",
                _ => false,
            };
            if !implied {
                return false;
            }
            self.stack.pop();
            if self.popped_one() {
                return true;
            }
        }
    }

    fn popped_one(&mut self) -> bool {
        let depth = self.stack.len();
        if self.in_heading && depth <= self.heading_depth {
            self.in_heading = false;
            if self.heading_text.to_lowercase().contains(&self.label) {
                self.in_section = true;
                self.section_depth = self.heading_depth;
            }
        } else if self.in_block && depth <= self.block_depth {
            self.flush_block();
        }
        // The heading's parent closed, so its siblings are done.
        self.in_section && depth < self.section_depth
    }

    fn flush_block(&mut self) {
        self.in_block = false;
        let text = normalize_ws(&self.fragments.join(" "));
        self.fragments.clear();
        if !text.is_empty() {
            self.blocks.push(text);
        }
    }

    fn finish(mut self) -> String {
        // A block left open at Eof still counts.
        if self.in_block {
            self.flush_block();
        }
        self.blocks.join("\n\n")
    }
}

// First <title> text, None when the document has no title element at all.
pub fn page_title(html: &str) -> Option<String> {
    let html = presanitize(html);

    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut found = false;
    let mut in_title = false;
    let mut fragments: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if tag_name(e.name().as_ref()) == "title" {
                    found = true;
                    in_title = true;
                }
            }
            Ok(Event::Empty(e)) => {
                if tag_name(e.name().as_ref()) == "title" {
                    found = true;
                    break;
                }
            }
            Ok(Event::Text(e)) => {
                if in_title {
                    fragments.push(decode_text(&e));
                }
            }
            Ok(Event::End(e)) => {
                if in_title && tag_name(e.name().as_ref()) == "title" {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::debug!("markup walk aborted: {err}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    found.then(|| normalize_ws(&fragments.join(" ")))
}

fn presanitize(html: &str) -> String {
    let stripped = strip_rawtext(html, "script");
    let stripped = strip_rawtext(&stripped, "style");
    escape_stray_lt(&stripped)
}

// script/style bodies are raw text to a browser but look like broken markup
// to an event reader, so cut those spans out before walking.
fn strip_rawtext(html: &str, tag: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0usize;

    while let Some(found) = lower[cursor..].find(&open) {
        let start = cursor + found;
        let boundary = lower.as_bytes().get(start + open.len());
        let tag_ends = matches!(
            boundary,
            Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/') | None
        );
        if !tag_ends {
            out.push_str(&html[cursor..start + open.len()]);
            cursor = start + open.len();
            continue;
        }
        out.push_str(&html[cursor..start]);
        cursor = match lower[start..].find(&close) {
            Some(found_close) => {
                let close_start = start + found_close;
                match lower[close_start..].find('>') {
                    Some(gt) => close_start + gt + 1,
                    None => lower.len(),
                }
            }
            None => lower.len(),
        };
    }
    out.push_str(&html[cursor..]);
    out
}

// Article prose uses bare '<' in comparisons ("p < .05"); escape any that
// cannot start a tag so the reader sees them as text.
fn escape_stray_lt(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '<' {
            let tag_like = matches!(
                chars.peek(),
                Some(&next) if next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')
            );
            if tag_like {
                out.push('<');
            } else {
                out.push_str("&lt;");
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn decode_text(e: &BytesText) -> String {
    match e.unescape_with(resolve_html_entity) {
        Ok(text) => text.into_owned(),
        Err(_) => normalize_entities(&String::from_utf8_lossy(e)),
    }
}

fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or(match entity {
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201c}"),
        "rdquo" => Some("\u{201d}"),
        "hellip" => Some("\u{2026}"),
        "middot" => Some("\u{b7}"),
        "deg" => Some("\u{b0}"),
        "micro" => Some("\u{b5}"),
        "times" => Some("\u{d7}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "trade" => Some("\u{2122}"),
        _ => None,
    })
}

fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h2" | "h3" | "h4")
}

fn is_content_block(name: &str) -> bool {
    matches!(name, "p" | "ul" | "ol")
}

// Start tags that implicitly end an open <p> in HTML5.
fn closes_p(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "details"
            | "div"
            | "dl"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "ul"
    )
}

fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

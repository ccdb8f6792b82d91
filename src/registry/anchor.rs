//! Minimal streaming markup scanner
//!
//! Index pages only need the text of their links, so instead of building a
//! document tree this module walks the markup once, keeps a stack of open
//! element names and reports text whose innermost open element matches a
//! predicate.

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A markup event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup<'a> {
    /// `<name ...>` or `<name ... />`
    Start { name: String, self_closing: bool },
    /// `</name>`
    End { name: String },
    /// Character data between tags, undecoded
    Text(&'a str),
}

/// Tokenizer yielding start tags, end tags and text runs
pub struct MarkupScanner<'a> {
    input: &'a str,
    pos: usize,
    raw_text_until: Option<String>,
}

impl<'a> MarkupScanner<'a> {
    /// Create a scanner over a document
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_until: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Move past the next occurrence of `needle`, or to the end of input
    fn skip_past(&mut self, needle: &str) {
        match self.rest().find(needle) {
            Some(idx) => self.pos += idx + needle.len(),
            None => self.pos = self.input.len(),
        }
    }

    fn read_raw_text(&mut self, element: &str) -> Option<Markup<'a>> {
        let closing = format!("</{}", element);
        let rest = self.rest();
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        self.pos += end;
        if end == 0 {
            None
        } else {
            Some(Markup::Text(&rest[..end]))
        }
    }

    fn read_text(&mut self) -> Markup<'a> {
        let rest = self.rest();
        // a stray `<` that does not open markup is plain text
        let end = rest
            .match_indices('<')
            .map(|(idx, _)| idx)
            .find(|&idx| idx > 0 && opens_markup(&rest[idx..]))
            .unwrap_or(rest.len());
        self.pos += end;
        Markup::Text(&rest[..end])
    }

    fn read_end_tag(&mut self) -> Markup<'a> {
        let rest = &self.rest()[2..];
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_ascii_lowercase();
        self.skip_past(">");
        Markup::End { name }
    }

    fn read_start_tag(&mut self) -> Markup<'a> {
        let rest = &self.rest()[1..];
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_ascii_lowercase();

        // scan attributes up to the closing `>`, honouring quoted values
        let mut quote: Option<char> = None;
        let mut last_significant = ' ';
        let mut consumed = rest.len();
        for (idx, c) in rest[name_len..].char_indices() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == '>' => {
                    consumed = name_len + idx + 1;
                    break;
                }
                None => {}
            }
            if !c.is_whitespace() {
                last_significant = c;
            }
        }
        self.pos += 1 + consumed;

        let self_closing = last_significant == '/';
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_until = Some(name.clone());
        }
        Markup::Start { name, self_closing }
    }
}

impl<'a> Iterator for MarkupScanner<'a> {
    type Item = Markup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(element) = self.raw_text_until.take() {
            if let Some(text) = self.read_raw_text(&element) {
                return Some(text);
            }
        }

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return None;
            }
            if !opens_markup(rest) {
                return Some(self.read_text());
            }
            if rest.starts_with("<!--") {
                self.skip_past("-->");
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(">");
                continue;
            }
            if rest.starts_with("</") {
                return Some(self.read_end_tag());
            }
            return Some(self.read_start_tag());
        }
    }
}

fn opens_markup(text: &str) -> bool {
    text.starts_with("</")
        || text.starts_with("<!")
        || text.starts_with("<?")
        || (text.starts_with('<') && text[1..].starts_with(|c: char| c.is_ascii_alphabetic()))
}

/// Collect decoded, trimmed, non-empty text whose innermost open element
/// satisfies `predicate`
pub fn collect_text_under(html: &str, predicate: impl Fn(&str) -> bool) -> Vec<String> {
    let mut open: Vec<String> = Vec::new();
    let mut texts = Vec::new();

    for event in MarkupScanner::new(html) {
        match event {
            Markup::Start { name, self_closing } => {
                if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                    open.push(name);
                }
            }
            Markup::End { name } => {
                if open.last() == Some(&name) {
                    open.pop();
                }
            }
            Markup::Text(text) => {
                if open.last().is_some_and(|top| predicate(top)) {
                    let text = decode_entities(text.trim());
                    if !text.is_empty() {
                        texts.push(text);
                    }
                }
            }
        }
    }

    texts
}

/// Text of every anchor element, in document order
pub fn anchor_texts(html: &str) -> Vec<String> {
    collect_text_under(html, |tag| tag == "a")
}

/// Decode the character references that show up in index pages
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

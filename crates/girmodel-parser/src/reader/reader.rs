//! Streaming markup reader.
//!
//! [`XmlReader`] walks the document once, front to back, and hands out
//! [`XmlEvent`]s. It understands exactly as much of the markup language as
//! the description corpus uses: the prolog, comments, DOCTYPE, CDATA,
//! quoted attributes, self-closing tags, the five named entities and
//! numeric character references. Anything malformed is a hard
//! [`XmlError`] - downstream merge and resolution assume a well-formed
//! tree, so there is no recovery path.

use super::cursor::Cursor;
use super::event::{Position, StartTag, XmlEvent};
use crate::error::XmlError;

/// Pull reader producing a flat event stream over one document.
pub struct XmlReader<'src> {
    cursor: Cursor<'src>,
    /// Names of currently open elements, for end-tag balance checking.
    open: Vec<String>,
    /// Lookahead slot for [`peek`](Self::peek).
    lookahead: Option<XmlEvent>,
}

impl<'src> XmlReader<'src> {
    /// Create a reader over the given document text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            open: Vec::new(),
            lookahead: None,
        }
    }

    /// Current position, for error reporting.
    pub fn position(&self) -> Position {
        Position::new(self.cursor.line(), self.cursor.column())
    }

    /// Peek at the next event without consuming it.
    pub fn peek(&mut self) -> Result<&XmlEvent, XmlError> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.read_event()?);
        }
        Ok(self.lookahead.as_ref().unwrap())
    }

    /// Consume and return the next event.
    pub fn next_event(&mut self) -> Result<XmlEvent, XmlError> {
        if let Some(event) = self.lookahead.take() {
            return Ok(event);
        }
        self.read_event()
    }

    /// Fast-forward past the content of an element whose start tag was
    /// just consumed, up to and including its matching end tag. Tracks
    /// nesting by depth, so same-named descendants do not end the skip
    /// early, and element names inside the skipped subtree are not
    /// inspected at all.
    pub fn skip_element(&mut self, start: &StartTag) -> Result<(), XmlError> {
        if start.self_closing {
            return Ok(());
        }
        let mut depth = 1usize;
        loop {
            match self.next_event()? {
                XmlEvent::Start(tag) if !tag.self_closing => depth += 1,
                XmlEvent::End { .. } => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlEvent::Eof => {
                    return Err(XmlError::UnexpectedEof {
                        position: self.position(),
                    });
                }
                _ => {}
            }
        }
    }

    // =========================================
    // Internal: event scanning
    // =========================================

    fn read_event(&mut self) -> Result<XmlEvent, XmlError> {
        loop {
            if self.cursor.is_eof() {
                return Ok(XmlEvent::Eof);
            }
            if !self.cursor.check_str("<") {
                return self.read_text();
            }
            // Dispatch on the construct after '<'.
            if self.cursor.check_str("<!--") {
                self.skip_comment()?;
                continue;
            }
            if self.cursor.check_str("<![CDATA[") {
                return self.read_cdata();
            }
            if self.cursor.check_str("<!") {
                self.skip_doctype()?;
                continue;
            }
            if self.cursor.check_str("<?") {
                self.skip_processing_instruction()?;
                continue;
            }
            if self.cursor.check_str("</") {
                return self.read_end_tag();
            }
            return self.read_start_tag();
        }
    }

    /// Character content up to the next tag.
    fn read_text(&mut self) -> Result<XmlEvent, XmlError> {
        let mut text = String::new();
        while !self.cursor.is_eof() && !self.cursor.check_str("<") {
            if self.cursor.check_str("&") {
                text.push(self.read_entity()?);
            } else {
                // advance() returns Some: not at EOF.
                if let Some(ch) = self.cursor.advance() {
                    text.push(ch);
                }
            }
        }
        Ok(XmlEvent::Text(text))
    }

    fn read_start_tag(&mut self) -> Result<XmlEvent, XmlError> {
        let position = self.position();
        self.cursor.eat('<');
        let name = self.read_name()?;
        let mut attributes = Vec::new();
        let self_closing;
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.eat_str("/>") {
                self_closing = true;
                break;
            }
            if self.cursor.eat('>') {
                self_closing = false;
                break;
            }
            if self.cursor.is_eof() {
                return Err(XmlError::UnexpectedEof {
                    position: self.position(),
                });
            }
            attributes.push(self.read_attribute()?);
        }
        if !self_closing {
            self.open.push(name.clone());
        }
        Ok(XmlEvent::Start(StartTag {
            name,
            attributes,
            self_closing,
            position,
        }))
    }

    fn read_end_tag(&mut self) -> Result<XmlEvent, XmlError> {
        let position = self.position();
        self.cursor.eat_str("</");
        let name = self.read_name()?;
        self.cursor.skip_whitespace();
        if !self.cursor.eat('>') {
            return Err(XmlError::MalformedTag {
                detail: format!("expected '>' to close </{name}>"),
                position: self.position(),
            });
        }
        match self.open.pop() {
            Some(expected) if expected == name => Ok(XmlEvent::End { name }),
            Some(expected) => Err(XmlError::MismatchedEndTag {
                expected,
                found: name,
                position,
            }),
            None => Err(XmlError::MalformedTag {
                detail: format!("closing tag </{name}> with no open element"),
                position,
            }),
        }
    }

    fn read_attribute(&mut self) -> Result<(String, String), XmlError> {
        let key = self.read_name()?;
        self.cursor.skip_whitespace();
        if !self.cursor.eat('=') {
            return Err(XmlError::MalformedTag {
                detail: format!("expected '=' after attribute '{key}'"),
                position: self.position(),
            });
        }
        self.cursor.skip_whitespace();
        let quote = match self.cursor.peek() {
            Some(q @ ('"' | '\'')) => {
                self.cursor.advance();
                q
            }
            Some(ch) => {
                return Err(XmlError::UnexpectedChar {
                    ch,
                    position: self.position(),
                });
            }
            None => {
                return Err(XmlError::UnexpectedEof {
                    position: self.position(),
                });
            }
        };
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                Some(ch) if ch == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('&') => value.push(self.read_entity()?),
                Some(ch) => {
                    self.cursor.advance();
                    value.push(ch);
                }
                None => {
                    return Err(XmlError::UnexpectedEof {
                        position: self.position(),
                    });
                }
            }
        }
        Ok((key, value))
    }

    /// An element or attribute name, prefix included.
    fn read_name(&mut self) -> Result<String, XmlError> {
        let name = self
            .cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'));
        if name.is_empty() {
            return match self.cursor.peek() {
                Some(ch) => Err(XmlError::UnexpectedChar {
                    ch,
                    position: self.position(),
                }),
                None => Err(XmlError::UnexpectedEof {
                    position: self.position(),
                }),
            };
        }
        Ok(name.to_string())
    }

    /// An entity reference: the five named entities, or a decimal or hex
    /// character reference.
    fn read_entity(&mut self) -> Result<char, XmlError> {
        let position = self.position();
        self.cursor.eat('&');
        let entity = self.cursor.eat_while(|c| c != ';' && c != '<' && !c.is_ascii_whitespace());
        if !self.cursor.eat(';') {
            return Err(XmlError::InvalidEntity {
                entity: entity.to_string(),
                position,
            });
        }
        let decoded = match entity {
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
        decoded.ok_or_else(|| XmlError::InvalidEntity {
            entity: entity.to_string(),
            position,
        })
    }

    fn read_cdata(&mut self) -> Result<XmlEvent, XmlError> {
        let position = self.position();
        self.cursor.eat_str("<![CDATA[");
        let mut text = String::new();
        loop {
            if self.cursor.eat_str("]]>") {
                return Ok(XmlEvent::Text(text));
            }
            match self.cursor.advance() {
                Some(ch) => text.push(ch),
                None => {
                    return Err(XmlError::UnexpectedEof { position });
                }
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), XmlError> {
        let position = self.position();
        self.cursor.eat_str("<!--");
        loop {
            if self.cursor.eat_str("-->") {
                return Ok(());
            }
            if self.cursor.advance().is_none() {
                return Err(XmlError::UnterminatedComment { position });
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<(), XmlError> {
        let position = self.position();
        self.cursor.eat_str("<!");
        let mut brackets = 0usize;
        loop {
            match self.cursor.advance() {
                Some('[') => brackets += 1,
                Some(']') => brackets = brackets.saturating_sub(1),
                Some('>') if brackets == 0 => return Ok(()),
                Some(_) => {}
                None => return Err(XmlError::UnexpectedEof { position }),
            }
        }
    }

    fn skip_processing_instruction(&mut self) -> Result<(), XmlError> {
        let position = self.position();
        self.cursor.eat_str("<?");
        loop {
            if self.cursor.eat_str("?>") {
                return Ok(());
            }
            if self.cursor.advance().is_none() {
                return Err(XmlError::UnexpectedEof { position });
            }
        }
    }
}

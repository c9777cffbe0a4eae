use searchql_ast::{
    Error, Group, Label, Node, Reason, Regex, RegexFlag, Return, Span, StringLit, Symbol,
    WithErrorInfo,
};

/// Hand-written, single-pass, one-character-lookahead recursive-descent
/// parser for the labelled search DSL.
///
/// Operates on `char`s rather than bytes so that lookahead (`:`, `=`, `->`,
/// `=>`) never splits a multi-byte UTF-8 sequence.
pub(crate) struct Scanner {
    chars: Vec<char>,
    idx: usize,
}

const SYMBOL_DELIMS: [char; 6] = [' ', ':', '=', '"', '(', ')'];

impl Scanner {
    pub(crate) fn new(query: &str) -> Self {
        Scanner {
            chars: query.chars().collect(),
            idx: 0,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.idx).copied();
        if c.is_some() {
            self.idx += 1;
        }
        c
    }

    fn peek_char(&self, n: usize) -> Option<char> {
        self.chars.get(self.idx + n).copied()
    }

    fn span(&self, start: usize) -> Span {
        Span::new(start, self.idx)
    }

    /// Parses a whitespace-separated sequence of nodes, stopping at `)` or
    /// end of input. The `)` itself, when present, is consumed.
    pub(crate) fn parse(&mut self) -> searchql_ast::Result<Vec<Node>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.parse_one()? {
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn parse_one(&mut self) -> searchql_ast::Result<Option<Node>> {
        loop {
            let start = self.idx;
            let c = match self.next_char() {
                Some(c) => c,
                None => return Ok(None),
            };
            match c {
                ')' => return Ok(None),
                ' ' => continue,
                '"' => return Ok(Some(self.parse_string(start)?)),
                '(' => return Ok(Some(self.parse_group(start)?)),
                '/' => return Ok(Some(self.parse_regex(start)?)),
                '-' | '=' if self.peek_char(0) == Some('>') => {
                    self.next_char(); // consume '>'
                    return Ok(Some(self.parse_return(start)?));
                }
                _ => {
                    self.idx -= 1;
                    return Ok(Some(self.parse_symbol_or_label(start)?));
                }
            }
        }
    }

    fn parse_string(&mut self, start: usize) -> searchql_ast::Result<Node> {
        let mut value = String::new();
        let mut escaped = false;
        loop {
            let c = self.next_char().ok_or_else(|| {
                Error::new(Reason::Parse("unterminated string literal".to_string()))
                    .with_span(Some(self.span(start)))
            })?;
            if escaped {
                value.push(c);
                escaped = false;
                continue;
            }
            match c {
                '"' => break,
                '\\' => escaped = true,
                _ => value.push(c),
            }
        }
        Ok(Node::String(StringLit {
            value,
            span: Some(self.span(start)),
        }))
    }

    fn parse_regex(&mut self, start: usize) -> searchql_ast::Result<Node> {
        let mut pattern = String::new();
        let mut escaped = false;
        loop {
            let c = self.next_char().ok_or_else(|| {
                Error::new(Reason::Parse("unterminated regex literal".to_string()))
                    .with_span(Some(self.span(start)))
            })?;
            if escaped {
                // Only `/` is an escape target; any other backslash sequence
                // is preserved verbatim for the downstream regex engine.
                if c != '/' {
                    pattern.push('\\');
                }
                pattern.push(c);
                escaped = false;
                continue;
            }
            match c {
                '/' => break,
                '\\' => escaped = true,
                _ => pattern.push(c),
            }
        }

        let mut flags = std::collections::BTreeSet::new();
        while let Some(c) = self.peek_char(0) {
            if c.is_alphabetic() {
                self.next_char();
                match c {
                    'i' => {
                        flags.insert(RegexFlag::CaseInsensitive);
                    }
                    other => {
                        return Err(Error::new(Reason::Parse(format!(
                            "unknown regex flag `{other}`"
                        )))
                        .with_span(Some(self.span(start))));
                    }
                }
            } else {
                break;
            }
        }

        Ok(Node::Regex(Regex {
            pattern,
            flags,
            span: Some(self.span(start)),
        }))
    }

    fn parse_group(&mut self, start: usize) -> searchql_ast::Result<Node> {
        let children = self.parse()?;
        Ok(Node::Group(Group {
            children,
            span: Some(self.span(start)),
        }))
    }

    fn parse_return(&mut self, start: usize) -> searchql_ast::Result<Node> {
        let mut fields = Vec::new();
        loop {
            // skip spaces
            while self.peek_char(0) == Some(' ') {
                self.next_char();
            }
            match self.peek_char(0) {
                None | Some(')') => break,
                Some(c) if SYMBOL_DELIMS.contains(&c) => {
                    return Err(Error::new(Reason::Parse(
                        "-> must be followed by a field name".to_string(),
                    ))
                    .with_span(Some(self.span(start))));
                }
                _ => {
                    let field_start = self.idx;
                    let field = self.read_symbol_chars();
                    if field.is_empty() {
                        return Err(Error::new(Reason::Parse(
                            "-> must be followed by a field name".to_string(),
                        ))
                        .with_span(Some(self.span(field_start))));
                    }
                    fields.push(field);
                }
            }
        }
        if fields.is_empty() {
            return Err(
                Error::new(Reason::Parse("-> must be followed by a field name".to_string()))
                    .with_span(Some(self.span(start))),
            );
        }
        Ok(Node::Return(Return {
            fields,
            span: Some(self.span(start)),
        }))
    }

    fn read_symbol_chars(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek_char(0) {
            if SYMBOL_DELIMS.contains(&c) || c == '/' {
                break;
            }
            value.push(c);
            self.next_char();
        }
        value
    }

    fn parse_symbol_or_label(&mut self, start: usize) -> searchql_ast::Result<Node> {
        let name = self.read_symbol_chars();

        match self.peek_char(0) {
            Some(':') => {
                self.next_char();
                let value = self.parse_one()?.ok_or_else(|| {
                    Error::new(Reason::Parse(format!("label `{name}` has no value")))
                        .with_span(Some(self.span(start)))
                })?;
                Ok(Node::Label(Label {
                    name,
                    value: Box::new(value),
                    exact: false,
                    span: Some(self.span(start)),
                }))
            }
            Some('=') => {
                self.next_char();
                let value = self.parse_one()?.ok_or_else(|| {
                    Error::new(Reason::Parse(format!("label `{name}` has no value")))
                        .with_span(Some(self.span(start)))
                })?;
                Ok(Node::Label(Label {
                    name,
                    value: Box::new(value),
                    exact: true,
                    span: Some(self.span(start)),
                }))
            }
            _ => Ok(Node::Symbol(Symbol {
                value: name,
                span: Some(self.span(start)),
            })),
        }
    }
}

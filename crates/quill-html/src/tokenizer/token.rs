use core::fmt;

pub use quill_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string)..."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    ///
    /// Attribute names are unique once the token is emitted; the first
    /// occurrence of a repeated name wins.
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes and the self-closing flag are parse errors
    /// on end tags but are still recorded.
    EndTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// One code point of character data.
    Character {
        /// "data"
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// "When a DOCTYPE token is created, its name, public identifier, and system
    /// identifier must be marked as missing, and the force-quirks flag must be
    /// set to off."
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset, and its attributes list must be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// A fresh end tag token.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// A comment token with the given data.
    #[must_use]
    pub fn new_comment(data: &str) -> Self {
        Self::Comment {
            data: data.to_string(),
        }
    }

    /// A start tag with the given name and attributes. Used by tests and by
    /// the tree constructor when it acts "as if" a tag had been seen.
    #[must_use]
    pub fn start_tag(name: &str, attributes: Vec<Attribute>) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes,
        }
    }

    /// An end tag with the given name.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Tag name for start and end tags.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Value of an attribute on a tag token.
    #[must_use]
    pub fn attribute(&self, attribute_name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == attribute_name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }

    // The mutation helpers below are only called while the tokenizer holds a
    // token of the matching kind; on any other kind they do nothing.

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's name."
    pub fn append_to_doctype_name(&mut self, c: char) {
        if let Self::Doctype { name, .. } = self {
            name.get_or_insert_with(String::new).push(c);
        }
    }

    /// Mark the public identifier as present and empty.
    pub fn set_public_identifier_empty(&mut self) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            *public_identifier = Some(String::new());
        }
    }

    /// Mark the system identifier as present and empty.
    pub fn set_system_identifier_empty(&mut self) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            *system_identifier = Some(String::new());
        }
    }

    /// [§ 13.2.5.59](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's
    /// public identifier."
    pub fn append_to_public_identifier(&mut self, c: char) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            public_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// system identifier."
    pub fn append_to_system_identifier(&mut self, c: char) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            system_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    pub fn set_force_quirks(&mut self) {
        if let Self::Doctype { force_quirks, .. } = self {
            *force_quirks = true;
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    pub fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name, .. } = self {
            name.push(c);
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    pub fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } | Self::EndTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// "Append the current input character to the comment token's data."
    pub fn append_to_comment(&mut self, c: char) {
        if let Self::Comment { data } = self {
            data.push(c);
        }
    }

    /// Append a string to the comment token's data.
    pub fn append_str_to_comment(&mut self, s: &str) {
        if let Self::Comment { data } = self {
            data.push_str(s);
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token."
    pub fn start_new_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            attributes.push(Attribute::new(String::new(), String::new()));
        }
    }

    /// "Append the current input character to the current attribute's name."
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self
            && let Some(attr) = attributes.last_mut()
        {
            attr.name.push(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub fn append_to_current_attribute_value(&mut self, c: char) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self
            && let Some(attr) = attributes.last_mut()
        {
            attr.value.push(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "...if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    #[must_use]
    pub fn current_attribute_name_is_duplicate(&self) -> bool {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => attributes
                .split_last()
                .is_some_and(|(current, earlier)| {
                    earlier.iter().any(|attr| attr.name == current.name)
                }),
            _ => false,
        }
    }

    /// Drop every attribute whose name already appeared earlier on the token.
    pub fn remove_duplicate_attributes(&mut self) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            let mut seen = std::collections::HashSet::new();
            attributes.retain(|attr| seen.insert(attr.name.clone()));
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => match data {
                '\n' => write!(f, "Character(\\n)"),
                '\t' => write!(f, "Character(\\t)"),
                ' ' => write!(f, "Character(SPACE)"),
                c => write!(f, "Character({c})"),
            },
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

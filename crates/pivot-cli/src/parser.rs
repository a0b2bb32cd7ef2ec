//! Line parser for the interactive prompt.
//!
//! Grammar: `<verb> [<type>] [index] [prefix:value ...]`.
//!
//! Words before the first prefix are positional (type, index, keywords). A
//! prefixed value runs until the next prefix, so values may contain spaces:
//!
//! ```text
//! add case t:Theft at Library d:Rare books missing s:open #:urgent
//! edit suspect 2 p:5550100 a:12 Baker Street
//! ```
//!
//! Indices are typed one-based and converted to [`Index`] here.

use pivot_core::ErrorCode;
use pivot_core::model::{
    Address, Case, CaseEdit, CasePerson, Description, Document, DocumentEdit, Email, Name,
    ParseEnumError, PersonEdit, Phone, Reference, Role, Sex, Status, Tag, Title, ValidationError,
};
use pivot_core::{Command, Index, Section};
use std::collections::{BTreeSet, VecDeque};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    Command(Command),
    Help,
    Exit,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownVerb(String),

    #[error("'{verb}' needs a type, e.g. `{verb} case`")]
    MissingTarget { verb: &'static str },

    #[error("'{verb}' does not work on '{target}'")]
    UnsupportedTarget { verb: &'static str, target: String },

    #[error("missing index")]
    MissingIndex,

    #[error("index must be a positive whole number, got '{0}'")]
    InvalidIndex(String),

    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("field {0} given more than once")]
    RepeatedField(&'static str),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("{0}")]
    InvalidField(#[from] ValidationError),

    #[error("{0}")]
    InvalidValue(#[from] ParseEnumError),
}

impl ParseError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidField(_) | Self::InvalidValue(_) => ErrorCode::InvalidField,
            Self::MissingIndex | Self::InvalidIndex(_) => ErrorCode::InvalidIndex,
            _ => ErrorCode::InvalidCommand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Title,
    Description,
    Status,
    Name,
    Sex,
    Phone,
    Email,
    Address,
    Reference,
    Tag,
}

impl Prefix {
    const ALL: [Self; 10] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Name,
        Self::Sex,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::Reference,
        Self::Tag,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "t:",
            Self::Description => "d:",
            Self::Status => "s:",
            Self::Name => "n:",
            Self::Sex => "g:",
            Self::Phone => "p:",
            Self::Email => "e:",
            Self::Address => "a:",
            Self::Reference => "r:",
            Self::Tag => "#:",
        }
    }

    fn split(token: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|prefix| token.strip_prefix(prefix.as_str()).map(|rest| (prefix, rest)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Case,
    Person(Role),
    Document,
    Tag,
    Archive,
}

impl Target {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "case" | "cases" => Some(Self::Case),
            "suspect" | "suspects" => Some(Self::Person(Role::Suspect)),
            "victim" | "victims" => Some(Self::Person(Role::Victim)),
            "witness" | "witnesses" => Some(Self::Person(Role::Witness)),
            "doc" | "docs" | "document" | "documents" => Some(Self::Document),
            "tag" | "tags" => Some(Self::Tag),
            "archive" => Some(Self::Archive),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Person(role) => role.as_str(),
            Self::Document => "doc",
            Self::Tag => "tag",
            Self::Archive => "archive",
        }
    }
}

/// Tokenised arguments after the verb.
struct Args<'a> {
    positional: VecDeque<&'a str>,
    fields: Vec<(Prefix, String)>,
}

impl<'a> Args<'a> {
    fn tokenize(rest: &'a str) -> Self {
        let mut positional = VecDeque::new();
        // (prefix, value start, value end) as byte offsets into `rest`
        let mut spans: Vec<(Prefix, usize, usize)> = Vec::new();
        for (offset, token) in tokens(rest) {
            let end = offset + token.len();
            if let Some((prefix, _)) = Prefix::split(token) {
                spans.push((prefix, offset + prefix.as_str().len(), end));
            } else if let Some(span) = spans.last_mut() {
                span.2 = end;
            } else {
                positional.push_back(token);
            }
        }
        let fields = spans
            .into_iter()
            .map(|(prefix, start, end)| (prefix, rest[start..end].trim_start().to_string()))
            .collect();
        Self { positional, fields }
    }

    fn target(&mut self, verb: &'static str) -> Result<Target, ParseError> {
        let word = self
            .positional
            .pop_front()
            .ok_or(ParseError::MissingTarget { verb })?;
        Target::parse(word).ok_or_else(|| ParseError::UnsupportedTarget {
            verb,
            target: word.to_string(),
        })
    }

    fn index(&mut self) -> Result<Index, ParseError> {
        let raw = self.positional.pop_front().ok_or(ParseError::MissingIndex)?;
        parse_index(raw)
    }

    fn optional_index(&mut self) -> Result<Option<Index>, ParseError> {
        self.positional.pop_front().map(parse_index).transpose()
    }

    fn take(&mut self, prefix: Prefix) -> Result<Option<String>, ParseError> {
        let mut values = self.take_all(prefix);
        if values.len() > 1 {
            return Err(ParseError::RepeatedField(prefix.as_str()));
        }
        Ok(values.pop())
    }

    fn take_all(&mut self, prefix: Prefix) -> Vec<String> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.fields)
            .into_iter()
            .partition(|(p, _)| *p == prefix);
        self.fields = kept;
        taken.into_iter().map(|(_, value)| value).collect()
    }

    fn require(&mut self, prefix: Prefix) -> Result<String, ParseError> {
        self.take(prefix)?
            .ok_or(ParseError::MissingField(prefix.as_str()))
    }

    fn rest(&mut self) -> Vec<String> {
        self.positional.drain(..).map(str::to_string).collect()
    }

    fn finish(self) -> Result<(), ParseError> {
        if let Some(word) = self.positional.front() {
            return Err(ParseError::UnexpectedArgument((*word).to_string()));
        }
        if let Some((prefix, value)) = self.fields.first() {
            return Err(ParseError::UnexpectedArgument(format!(
                "{}{value}",
                prefix.as_str()
            )));
        }
        Ok(())
    }
}

/// Whitespace-separated tokens with their byte offsets.
fn tokens(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                tokens.push((s, &text[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, &text[s..]));
    }
    tokens
}

fn parse_index(raw: &str) -> Result<Index, ParseError> {
    raw.parse::<usize>()
        .ok()
        .and_then(Index::from_one_based)
        .ok_or_else(|| ParseError::InvalidIndex(raw.to_string()))
}

fn parse_tags(raw: Vec<String>) -> Result<Vec<Tag>, ParseError> {
    Ok(raw
        .into_iter()
        .map(Tag::new)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Parse one input line.
///
/// # Errors
///
/// [`ParseError`] when the line does not match the grammar or a field value
/// fails validation.
pub fn parse_command(line: &str) -> Result<ParsedInput, ParseError> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    if verb.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut args = Args::tokenize(rest);
    let parsed = match verb.to_ascii_lowercase().as_str() {
        "help" => ParsedInput::Help,
        "exit" => ParsedInput::Exit,
        "save" => ParsedInput::Save,
        "undo" => ParsedInput::Command(Command::Undo),
        "redo" => ParsedInput::Command(Command::Redo),
        "return" => ParsedInput::Command(Command::ReturnToList),
        "add" => ParsedInput::Command(add(&mut args)?),
        "delete" => ParsedInput::Command(delete(&mut args)?),
        "edit" => ParsedInput::Command(edit(&mut args)?),
        "archive" => ParsedInput::Command(Command::ArchiveCase {
            index: case_index(&mut args, "archive")?,
        }),
        "unarchive" => ParsedInput::Command(Command::UnarchiveCase {
            index: case_index(&mut args, "unarchive")?,
        }),
        "open" => ParsedInput::Command(Command::OpenCase {
            index: case_index(&mut args, "open")?,
        }),
        "list" => ParsedInput::Command(list(&mut args)?),
        "find" => ParsedInput::Command(find(&mut args)?),
        "view" => ParsedInput::Command(view(&mut args)?),
        _ => return Err(ParseError::UnknownVerb(verb.to_string())),
    };
    args.finish()?;
    Ok(parsed)
}

fn unsupported(verb: &'static str, target: Target) -> ParseError {
    ParseError::UnsupportedTarget {
        verb,
        target: target.as_str().to_string(),
    }
}

fn case_index(args: &mut Args<'_>, verb: &'static str) -> Result<Index, ParseError> {
    match args.target(verb)? {
        Target::Case => args.index(),
        other => Err(unsupported(verb, other)),
    }
}

fn add(args: &mut Args<'_>) -> Result<Command, ParseError> {
    match args.target("add")? {
        Target::Case => {
            let mut case = Case::new(Title::new(args.require(Prefix::Title)?)?);
            if let Some(description) = args.take(Prefix::Description)? {
                case = case.with_description(Description::new(description)?);
            }
            if let Some(status) = args.take(Prefix::Status)? {
                case = case.with_status(status.parse::<Status>()?);
            }
            let tags = parse_tags(args.take_all(Prefix::Tag))?;
            if !tags.is_empty() {
                case = case.with_tags(tags.into_iter().collect::<BTreeSet<_>>());
            }
            Ok(Command::AddCase(case))
        }
        Target::Person(role) => Ok(Command::AddPerson {
            role,
            person: person(args)?,
        }),
        Target::Document => {
            let name = Name::new(args.require(Prefix::Name)?)?;
            let reference = Reference::new(args.require(Prefix::Reference)?)?;
            Ok(Command::AddDocument(Document::new(name, reference)))
        }
        Target::Tag => {
            let tags = parse_tags(args.take_all(Prefix::Tag))?;
            if tags.is_empty() {
                return Err(ParseError::MissingField(Prefix::Tag.as_str()));
            }
            Ok(Command::AddTags { tags })
        }
        Target::Archive => Err(unsupported("add", Target::Archive)),
    }
}

fn person(args: &mut Args<'_>) -> Result<CasePerson, ParseError> {
    let mut person = CasePerson::new(Name::new(args.require(Prefix::Name)?)?);
    if let Some(sex) = args.take(Prefix::Sex)? {
        person = person.with_sex(sex.parse::<Sex>()?);
    }
    if let Some(phone) = args.take(Prefix::Phone)? {
        person = person.with_phone(Phone::new(phone)?);
    }
    if let Some(email) = args.take(Prefix::Email)? {
        person = person.with_email(Email::new(email)?);
    }
    if let Some(address) = args.take(Prefix::Address)? {
        person = person.with_address(Address::new(address)?);
    }
    Ok(person)
}

fn delete(args: &mut Args<'_>) -> Result<Command, ParseError> {
    match args.target("delete")? {
        Target::Case => Ok(Command::DeleteCase {
            index: args.index()?,
        }),
        Target::Person(role) => Ok(Command::DeletePerson {
            role,
            index: args.index()?,
        }),
        Target::Document => Ok(Command::DeleteDocument {
            index: args.index()?,
        }),
        Target::Tag => Ok(Command::DeleteTag {
            tag: Tag::new(args.require(Prefix::Tag)?)?,
        }),
        Target::Archive => Err(unsupported("delete", Target::Archive)),
    }
}

fn edit(args: &mut Args<'_>) -> Result<Command, ParseError> {
    match args.target("edit")? {
        Target::Case => {
            let index = args.optional_index()?;
            let edit = CaseEdit {
                title: args.take(Prefix::Title)?.map(Title::new).transpose()?,
                description: args
                    .take(Prefix::Description)?
                    .map(Description::new)
                    .transpose()?,
                status: args
                    .take(Prefix::Status)?
                    .map(|raw| raw.parse::<Status>())
                    .transpose()?,
            };
            Ok(Command::EditCase { index, edit })
        }
        Target::Person(role) => {
            let index = args.index()?;
            let edit = PersonEdit {
                name: args.take(Prefix::Name)?.map(Name::new).transpose()?,
                sex: args
                    .take(Prefix::Sex)?
                    .map(|raw| raw.parse::<Sex>())
                    .transpose()?,
                phone: args.take(Prefix::Phone)?.map(Phone::new).transpose()?,
                email: args.take(Prefix::Email)?.map(Email::new).transpose()?,
                address: args.take(Prefix::Address)?.map(Address::new).transpose()?,
            };
            Ok(Command::EditPerson { role, index, edit })
        }
        Target::Document => {
            let index = args.index()?;
            let edit = DocumentEdit {
                name: args.take(Prefix::Name)?.map(Name::new).transpose()?,
                reference: args
                    .take(Prefix::Reference)?
                    .map(Reference::new)
                    .transpose()?,
            };
            Ok(Command::EditDocument { index, edit })
        }
        other => Err(unsupported("edit", other)),
    }
}

fn list(args: &mut Args<'_>) -> Result<Command, ParseError> {
    match args.target("list")? {
        Target::Case => Ok(Command::ListCases { archived: false }),
        Target::Archive => Ok(Command::ListCases { archived: true }),
        other => Err(unsupported("list", other)),
    }
}

fn find(args: &mut Args<'_>) -> Result<Command, ParseError> {
    match args.target("find")? {
        Target::Case => {
            let keywords = args.rest();
            if keywords.is_empty() {
                return Err(ParseError::MissingField("keyword"));
            }
            Ok(Command::FindCases { keywords })
        }
        other => Err(unsupported("find", other)),
    }
}

fn view(args: &mut Args<'_>) -> Result<Command, ParseError> {
    match args.target("view")? {
        Target::Person(role) => Ok(Command::ViewSection(Section::from(role))),
        Target::Document => Ok(Command::ViewSection(Section::Documents)),
        other => Err(unsupported("view", other)),
    }
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
Cases (case list page):
  add case t:TITLE [d:DESCRIPTION] [s:STATUS] [#:TAG]...
  delete case INDEX
  edit case INDEX [t:TITLE] [d:DESCRIPTION] [s:STATUS]
  archive case INDEX          unarchive case INDEX
  list case                   list archive
  find case KEYWORD...
  open case INDEX
Open case page:
  edit case [t:TITLE] [d:DESCRIPTION] [s:STATUS]
  add tag #:TAG...            delete tag #:TAG
  view suspects|victims|witnesses|docs
  add suspect|victim|witness n:NAME [g:M|F|-] [p:PHONE] [e:EMAIL] [a:ADDRESS]
  add doc n:NAME r:REFERENCE
  delete suspect|victim|witness|doc INDEX      (section must be open)
  edit suspect|victim|witness|doc INDEX FIELDS (section must be open)
  return
Anywhere:
  undo  redo  save  help  exit";

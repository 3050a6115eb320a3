use crate::error::{Error, Result};

/// Represents the smallest meaningful units (atoms) of the query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- Keywords ---
    Create,
    Table,
    As,
    Load,
    Store,
    Drop,
    Insert,
    Into,
    Values,
    Print,
    Select,
    From,
    Where,
    And,

    // --- Data Types ---
    StringType,
    Int,
    Float,

    // --- Identifiers & Literals ---
    /// A name representing a table or a column (e.g., `users`, `id`).
    Ident(String),
    /// A numeric literal, kept as written (e.g., `42`, `007`, `2.5`).
    Number(String),
    /// A string literal, defined between single quotes (e.g., `'Alice'`).
    /// Holds the content without its quotes.
    String(String),
    /// The `NOVALUE` sentinel.
    NoValue,

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Dot `.` not followed by a digit
    Dot,
    /// Multiplication or wildcard symbol `*`
    Star,
    Plus,
    Minus,
    Slash,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Lower,
    /// `<=`
    LowerEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    // --- Special ---
    /// Represents the End Of File/Input.
    Eof,
}

/// A lexical scanner (lexer) that converts a query string into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens.
    ///
    /// # Errors
    /// Returns an error if an invalid character is encountered or if a literal
    /// (like a string) is malformed.
    ///
    /// # Example
    /// ```
    /// # use reldb::tokenizer::{Tokenizer, Token};
    /// let mut t = Tokenizer::new("select *");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens[0], Token::Select);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token> {
        let ch = self.current_char();

        match ch {
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '*' => self.single(Token::Star),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '/' => self.single(Token::Slash),
            '=' => self.pair('=', Token::Equal, None),
            '!' => self.pair('=', Token::NotEqual, None),
            '<' => self.pair('=', Token::LowerEqual, Some(Token::Lower)),
            '>' => self.pair('=', Token::GreaterEqual, Some(Token::Greater)),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            '.' => self.single(Token::Dot),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c if c.is_ascii_digit() => self.read_number(),
            '\'' => self.read_string(),
            _ => Err(Error::malformed(format!("character {ch:?} is not supported"))),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn single(&mut self, token: Token) -> Result<Token> {
        self.advance();
        Ok(token)
    }

    /// Reads a two-character operator whose second character is `second`,
    /// falling back to `alone` when only the first character is present.
    fn pair(&mut self, second: char, both: Token, alone: Option<Token>) -> Result<Token> {
        let first = self.current_char();
        self.advance();
        if !self.is_at_end() && self.current_char() == second {
            self.advance();
            return Ok(both);
        }
        alone.ok_or_else(|| Error::malformed(format!("invalid operator {first:?}")))
    }

    // --- Extraction Logic ---

    /// Reads a sequence of alphanumeric characters and determines if it's
    /// a reserved keyword or a user-defined identifier.
    ///
    /// Keywords are matched case-insensitively, the `NOVALUE` sentinel is not.
    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }

        if ident == crate::value::NOVALUE {
            return Token::NoValue;
        }

        match ident.to_lowercase().as_str() {
            "create" => Token::Create,
            "table" => Token::Table,
            "as" => Token::As,
            "load" => Token::Load,
            "store" => Token::Store,
            "drop" => Token::Drop,
            "insert" => Token::Insert,
            "into" => Token::Into,
            "values" => Token::Values,
            "print" => Token::Print,
            "select" => Token::Select,
            "from" => Token::From,
            "where" => Token::Where,
            "and" => Token::And,
            "string" => Token::StringType,
            "int" => Token::Int,
            "float" => Token::Float,
            _ => Token::Ident(ident),
        }
    }

    /// Reads a numeric literal, keeping its text as written.
    fn read_number(&mut self) -> Result<Token> {
        let mut number = String::new();
        let mut has_dot = false;

        while !self.is_at_end()
            && (self.current_char().is_ascii_digit() || (self.current_char() == '.' && !has_dot))
        {
            if self.current_char() == '.' {
                has_dot = true;
            }
            number.push(self.current_char());
            self.advance();
        }

        if !self.is_at_end() && self.current_char() == '.' {
            return Err(Error::malformed("multiple dots are not allowed for a float"));
        }

        Ok(Token::Number(number))
    }

    /// Reads a string literal enclosed in single quotes.
    fn read_string(&mut self) -> Result<Token> {
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != '\'' {
            string.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::malformed("unterminated string"));
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }
}

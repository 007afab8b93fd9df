/// SQL keywords and punctuation used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Token {
    // Keywords
    SELECT,
    FROM,
    WHERE,
    WITH,
    AS,
    ON,
    AND,
    LEFT,
    JOIN,
    ORDER,
    BY,
    ASC,
    DESC,
    LIMIT,
    OFFSET,
    GLOB,
    IS,
    NOT,
    NULL,

    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    SEMI,
    DOT,
    STAR,

    // Operators
    EQ,
    NE,
    LT,
    GT,
    LE,
    GE,
    MINUS,
}

impl Token {
    pub const fn as_str(self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::WITH => "WITH",
            Token::AS => "AS",
            Token::ON => "ON",
            Token::AND => "AND",
            Token::LEFT => "LEFT",
            Token::JOIN => "JOIN",
            Token::ORDER => "ORDER",
            Token::BY => "BY",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::GLOB => "GLOB",
            Token::IS => "IS",
            Token::NOT => "NOT",
            Token::NULL => "NULL",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::SEMI => ";",
            Token::DOT => ".",
            Token::STAR => "*",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::GT => ">",
            Token::LE => "<=",
            Token::GE => ">=",
            Token::MINUS => "-",
        }
    }

    /// Comparison and arithmetic operators, rendered with surrounding spaces.
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Token::EQ | Token::NE | Token::LT | Token::GT | Token::LE | Token::GE | Token::MINUS
        )
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! # Lexer 模块
//!
//! 手写词法分析器，把规则文本切分为 token 流。
//!
//! token 之间的空白不携带语义，直接丢弃。
//! 输出的 token 序列总是以显式的 [`TokenKind::Eof`] 结尾，
//! 解析器不会读取越过它。

use crate::error::LexError;

/// Token 类型
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// 标识符
    Ident(String),
    /// 整数字面量
    Int(i64),
    /// 字符串字面量（已去除引号和转义）
    Str(String),
    /// 布尔字面量
    Bool(bool),

    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `!`
    Bang,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    /// 输入结束标记
    Eof,
}

/// 词法单元
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// token 类型（字面量携带解码后的值）
    pub kind: TokenKind,
    /// 源文本
    pub lexeme: String,
    /// 在输入中的字节偏移
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }
}

/// 将规则文本切分为 token 序列
///
/// 成功时返回以 `Eof` 结尾的 token 序列。
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).run()
}

/// 词法分析器
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// 若剩余输入以 `text` 开头则消费它
    fn eat(&mut self, text: &str) -> bool {
        if self.input[self.pos..].starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let offset = self.pos;

            let Some(c) = self.peek_char() else {
                tokens.push(Token::new(TokenKind::Eof, "", offset));
                return Ok(tokens);
            };

            let token = if c.is_ascii_alphabetic() || c == '_' {
                self.lex_ident(offset)
            } else if c.is_ascii_digit() {
                self.lex_int(offset)?
            } else if c == '"' {
                self.lex_string(offset)?
            } else {
                self.lex_operator(c, offset)?
            };
            tokens.push(token);
        }
    }

    /// 标识符：`[A-Za-z_][A-Za-z0-9_]*`；`true`/`false` 识别为布尔字面量
    fn lex_ident(&mut self, offset: usize) -> Token {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let lexeme = &self.input[offset..self.pos];
        let kind = match lexeme {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            _ => TokenKind::Ident(lexeme.to_string()),
        };
        Token::new(kind, lexeme, offset)
    }

    /// 十进制整数字面量
    fn lex_int(&mut self, offset: usize) -> Result<Token, LexError> {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let lexeme = &self.input[offset..self.pos];
        let value = lexeme.parse::<i64>().map_err(|_| LexError::IntegerOverflow {
            literal: lexeme.to_string(),
            offset,
        })?;
        Ok(Token::new(TokenKind::Int(value), lexeme, offset))
    }

    /// 双引号字符串字面量
    ///
    /// 反斜杠转义只保证定界符转义：`\` 后的任意字符原样进入字符串。
    fn lex_string(&mut self, offset: usize) -> Result<Token, LexError> {
        self.consume_char(); // 消费开始引号
        let mut text = String::new();

        loop {
            let Some(c) = self.consume_char() else {
                return Err(LexError::UnterminatedString { offset });
            };
            match c {
                '"' => {
                    let lexeme = &self.input[offset..self.pos];
                    return Ok(Token::new(TokenKind::Str(text), lexeme, offset));
                }
                '\\' => {
                    let Some(escaped) = self.consume_char() else {
                        return Err(LexError::UnterminatedString { offset });
                    };
                    text.push(escaped);
                }
                other => text.push(other),
            }
        }
    }

    /// 运算符与定界符
    fn lex_operator(&mut self, c: char, offset: usize) -> Result<Token, LexError> {
        // 双字符运算符优先
        for (text, kind) in [
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::BangEq),
            ("<=", TokenKind::Le),
            (">=", TokenKind::Ge),
            ("&&", TokenKind::AndAnd),
            ("||", TokenKind::OrOr),
        ] {
            if self.eat(text) {
                return Ok(Token::new(kind, text, offset));
            }
        }

        let kind = match c {
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '!' => TokenKind::Bang,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            other => return Err(LexError::UnexpectedChar { ch: other, offset }),
        };
        self.consume_char();
        Ok(Token::new(kind, c.to_string(), offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input_has_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_identifiers_and_literals() {
        assert_eq!(
            kinds("a _x1 42 \"hi\" true false"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Ident("_x1".to_string()),
                TokenKind::Int(42),
                TokenKind::Str("hi".to_string()),
                TokenKind::Bool(true),
                TokenKind::Bool(false),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("== != < > <= >= && || + - * / ! ( ) [ ] ,"),
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Bang,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators_without_spaces() {
        assert_eq!(
            kinds("a<=1&&b>=2"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Le,
                TokenKind::Int(1),
                TokenKind::AndAnd,
                TokenKind::Ident("b".to_string()),
                TokenKind::Ge,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""say \"hi\"" "back\\slash""#),
            vec![
                TokenKind::Str("say \"hi\"".to_string()),
                TokenKind::Str("back\\slash".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_token_offsets() {
        let tokens = tokenize("a == 10").unwrap();
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 2);
        assert_eq!(tokens[2].offset, 5);
        // Eof 的偏移是输入长度
        assert_eq!(tokens[3].offset, 7);
    }

    #[test]
    fn test_unexpected_char() {
        let err = tokenize("a @ b").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '@', offset: 2 });

        // 单独的 & / | 不是合法运算符
        let err = tokenize("a & b").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '&', offset: 2 });
        let err = tokenize("a | b").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '|', offset: 2 });
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("a == \"oops").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { offset: 5 });

        // 转义后直接结束同样算未闭合
        let err = tokenize("\"oops\\").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { offset: 0 });
    }

    #[test]
    fn test_integer_overflow() {
        // i64::MAX 是 9223372036854775807
        assert_eq!(kinds("9223372036854775807")[0], TokenKind::Int(i64::MAX));

        let err = tokenize("9223372036854775808").unwrap_err();
        assert!(matches!(err, LexError::IntegerOverflow { offset: 0, .. }));
    }
}

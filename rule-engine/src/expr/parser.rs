//! # Parser 模块
//!
//! 递归下降表达式解析器，按优先级爬升组织：
//! 每个优先级一个解析函数，操作数交给更紧的一级解析。
//!
//! ## 文法
//!
//! ```text
//! expr        := orExpr
//! orExpr      := andExpr ( "||" andExpr )*
//! andExpr     := cmpExpr ( "&&" cmpExpr )*
//! cmpExpr     := addExpr ( ("=="|"!="|"<"|">"|"<="|">=") addExpr )?
//! addExpr     := mulExpr ( ("+"|"-") mulExpr )*
//! mulExpr     := unary ( ("*"|"/") unary )*
//! unary       := ("!"|"-")? primary
//! primary     := IDENT | INT | STRING | BOOL | arrayLit
//!              | IDENT "(" (expr ("," expr)*)? ")"
//!              | "(" expr ")"
//! arrayLit    := "[" (literal ("," literal)*)? "]"
//! ```

use crate::error::ParseError;
use crate::expr::ast::{BinaryOp, Expr, UnaryOp};
use crate::expr::lexer::{Token, TokenKind, tokenize};

/// 解析规则表达式文本
///
/// 词法切分后做优先级爬升解析，并拒绝末尾的多余内容。
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = ExprParser::new(tokens);
    let expr = parser.parse_or()?;
    parser.expect_end()?;
    Ok(expr)
}

/// 表达式解析器
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// 当前 token；token 流以 Eof 结尾，不会越界
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// 消费并返回当前 token；在 Eof 上停住
    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// 若当前 token 是 `kind` 则消费它
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// 期望并消费 `kind`，否则报错
    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            }
        } else {
            ParseError::UnexpectedToken {
                offset: token.offset,
                expected: expected.to_string(),
                found: token.lexeme.clone(),
            }
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(ParseError::TrailingInput {
                offset: token.offset,
                found: token.lexeme.clone(),
            })
        }
    }

    /// 解析逻辑或（最低优先级）
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    /// 解析逻辑与
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.parse_comparison()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    /// 解析比较（不结合：最多一个比较运算符）
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match self.peek().kind {
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Ge => BinaryOp::Ge,
            _ => return Ok(left),
        };
        self.bump();

        let right = self.parse_additive()?;
        Ok(Expr::binary(op, left, right))
    }

    /// 解析加减
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
    }

    /// 解析乘除
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
    }

    /// 解析一元运算（最多一个前缀）
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        };

        match op {
            Some(op) => {
                self.bump();
                let operand = self.parse_primary()?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_primary(),
        }
    }

    /// 解析基本表达式
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Int(n) => Ok(Expr::Int(n)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::Bool(b) => Ok(Expr::Bool(b)),

            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }

            TokenKind::LParen => {
                let inner = self.parse_or()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }

            TokenKind::LBracket => self.parse_array_literal(),

            TokenKind::Eof => Err(ParseError::UnexpectedEnd {
                expected: "表达式".to_string(),
            }),
            _ => Err(ParseError::UnexpectedToken {
                offset: token.offset,
                expected: "表达式".to_string(),
                found: token.lexeme,
            }),
        }
    }

    /// 解析函数调用参数（开括号已消费）
    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_or()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen, "',' 或 ')'")?;
            return Ok(args);
        }
    }

    /// 解析数组字面量（开方括号已消费）
    ///
    /// 元素只允许字面量，不允许变量或嵌套表达式
    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let mut elements = Vec::new();

        if self.eat(&TokenKind::RBracket) {
            return Ok(Expr::Array(elements));
        }

        loop {
            elements.push(self.parse_literal()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RBracket, "',' 或 ']'")?;
            return Ok(Expr::Array(elements));
        }
    }

    /// 解析单个字面量（数组元素用）
    fn parse_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Int(n) => Ok(Expr::Int(n)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::Bool(b) => Ok(Expr::Bool(b)),
            TokenKind::Eof => Err(ParseError::UnexpectedEnd {
                expected: "字面量".to_string(),
            }),
            _ => Err(ParseError::UnexpectedToken {
                offset: token.offset,
                expected: "字面量".to_string(),
                found: token.lexeme,
            }),
        }
    }
}

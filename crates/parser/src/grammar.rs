//! Recursive-descent parser for the rule grammar, with a Pratt
//! (precedence-climbing) sub-parser for `valueexpr`.

use crate::error::ParseError;
use crate::lexer::{Lexeme, Token};
use rulechef_tokens::{
    opcodes, BinOp, BinOpKind, ComparisonOp, Constraint, Expr, Number, Opcode, OpcodeOr, Rule,
    Size, Var,
};

pub(crate) fn parse_rule(lexemes: &[Lexeme]) -> Result<Rule, ParseError> {
    let mut p = Parser { lexemes, pos: 0 };
    let rule = p.rule()?;
    if let Some(lex) = p.lexemes.get(p.pos) {
        return Err(ParseError::UnexpectedToken {
            line: lex.line,
            col: lex.col,
            expected: "end of input",
            found: describe(&lex.token),
        });
    }
    Ok(rule)
}

struct Parser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.lexemes.get(self.pos).map(|l| &l.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.lexemes.get(self.pos + offset).map(|l| &l.token)
    }

    fn loc(&self) -> (usize, usize) {
        match self.lexemes.get(self.pos) {
            Some(l) => (l.line, l.col),
            None => match self.lexemes.last() {
                Some(l) => (l.line, l.col + 1),
                None => (1, 1),
            },
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.lexemes.get(self.pos).map(|l| l.token.clone());
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eof_err(&self, expected: &'static str) -> ParseError {
        let (line, col) = self.loc();
        ParseError::UnexpectedEof { line, col, expected }
    }

    fn expect(&mut self, want: &Token, expected: &'static str) -> Result<(), ParseError> {
        match self.peek() {
            Some(t) if t == want => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => {
                let (line, col) = self.loc();
                Err(ParseError::UnexpectedToken {
                    line,
                    col,
                    expected,
                    found: describe(t),
                })
            }
            None => Err(self.eof_err(expected)),
        }
    }

    fn match_token(&mut self, want: &Token) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<(String, usize, usize), ParseError> {
        let (line, col) = self.loc();
        match self.advance() {
            Some(Token::Ident(name)) => Ok((name, line, col)),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                col,
                expected,
                found: describe(&other),
            }),
            None => Err(self.eof_err(expected)),
        }
    }

    fn is_opexpr_start(&self) -> bool {
        matches!(self.peek(), Some(Token::Ident(_))) && matches!(self.peek_at(1), Some(Token::LParen))
    }

    /// `rule := NAME ':' matchexpr [ ':-' '{' constraint* '}' ] '=>' replaceexpr`
    fn rule(&mut self) -> Result<Rule, ParseError> {
        let (name, _, _) = self.expect_ident("a rule name")?;
        self.expect(&Token::Colon, "':'")?;
        let match_expr = self.opexpr()?;

        let mut constraints = Vec::new();
        if self.match_token(&Token::ColonDash) {
            self.expect(&Token::LBrace, "'{'")?;
            while !matches!(self.peek(), Some(Token::RBrace)) {
                constraints.push(self.constraint()?);
            }
            self.expect(&Token::RBrace, "'}'")?;
        }

        self.expect(&Token::FatArrow, "'=>'")?;
        let replace_expr = self.replaceexpr()?;

        Ok(Rule::new(name, match_expr, constraints, replace_expr))
    }

    /// `replaceexpr := opexpr | VAR`
    fn replaceexpr(&mut self) -> Result<Expr, ParseError> {
        if self.is_opexpr_start() {
            Ok(Expr::Opcode(self.opexpr()?))
        } else {
            let (name, _, _) = self.expect_ident("a variable or opcode")?;
            Ok(Expr::Var(Var::new(format!("autovar_{name}"))))
        }
    }

    /// `opexpr := OPCODE '(' expr (',' expr)* ')'`
    fn opexpr(&mut self) -> Result<Opcode, ParseError> {
        let (name, line, col) = self.expect_ident("an opcode")?;
        if !opcodes::is_known(&name) {
            return Err(ParseError::UnknownOpcode { line, col, name });
        }
        self.expect(&Token::LParen, "'('")?;
        let mut args = vec![self.expr()?];
        while self.match_token(&Token::Comma) {
            args.push(self.expr()?);
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(Opcode::new(name, args))
    }

    /// `altexpr := opexpr ('|' (VAR | opexpr))*`
    fn altexpr(&mut self) -> Result<Expr, ParseError> {
        let first = Expr::Opcode(self.opexpr()?);
        if !matches!(self.peek(), Some(Token::Pipe)) {
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.match_token(&Token::Pipe) {
            let alt = if self.is_opexpr_start() {
                Expr::Opcode(self.opexpr()?)
            } else {
                let (name, _, _) = self.expect_ident("a variable or opcode")?;
                Expr::Var(Var::new(format!("autovar_{name}")))
            };
            elements.push(alt);
        }
        Ok(Expr::OpcodeOr(OpcodeOr::new(elements)))
    }

    /// `expr := altexpr | valueexpr`
    fn expr(&mut self) -> Result<Expr, ParseError> {
        if self.is_opexpr_start() {
            self.altexpr()
        } else {
            self.valueexpr()
        }
    }

    /// `constraint := valueexpr ('<' | '>' | '=') expr`
    fn constraint(&mut self) -> Result<Constraint, ParseError> {
        let lhs = self.valueexpr()?;
        let (line, col) = self.loc();
        let op = match self.advance() {
            Some(Token::Lt) => ComparisonOp::Less,
            Some(Token::Gt) => ComparisonOp::Greater,
            Some(Token::Eq) => ComparisonOp::Equal,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    col,
                    expected: "'<', '>', or '='",
                    found: describe(&other),
                })
            }
            None => return Err(self.eof_err("'<', '>', or '='")),
        };
        let rhs = self.expr()?;
        Ok(Constraint::new(lhs, op, rhs))
    }

    // valueexpr, lowest to highest: | ^ & << >> + - *, all left-associative.

    fn valueexpr(&mut self) -> Result<Expr, ParseError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.xor_expr()?;
        while self.match_token(&Token::Pipe) {
            let rhs = self.xor_expr()?;
            lhs = Expr::BinOp(BinOp::new(BinOpKind::Or, lhs, rhs));
        }
        Ok(lhs)
    }

    fn xor_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.match_token(&Token::Caret) {
            let rhs = self.and_expr()?;
            lhs = Expr::BinOp(BinOp::new(BinOpKind::Xor, lhs, rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.shift_expr()?;
        while self.match_token(&Token::Amp) {
            let rhs = self.shift_expr()?;
            lhs = Expr::BinOp(BinOp::new(BinOpKind::And, lhs, rhs));
        }
        Ok(lhs)
    }

    fn shift_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.add_expr()?;
        loop {
            let kind = match self.peek() {
                Some(Token::Shl) => BinOpKind::Lshift,
                Some(Token::Shr) => BinOpKind::Rshift,
                _ => break,
            };
            self.advance();
            let rhs = self.add_expr()?;
            lhs = Expr::BinOp(BinOp::new(kind, lhs, rhs));
        }
        Ok(lhs)
    }

    fn add_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.mul_expr()?;
        loop {
            let kind = match self.peek() {
                Some(Token::Plus) => BinOpKind::Add,
                Some(Token::Minus) => BinOpKind::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.mul_expr()?;
            lhs = Expr::BinOp(BinOp::new(kind, lhs, rhs));
        }
        Ok(lhs)
    }

    fn mul_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.atom()?;
        while self.match_token(&Token::Star) {
            let rhs = self.atom()?;
            lhs = Expr::BinOp(BinOp::new(BinOpKind::Mult, lhs, rhs));
        }
        Ok(lhs)
    }

    /// `value := VAR | sized_number | sizeof`, plus parenthesized grouping.
    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.valueexpr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Pipe) => {
                self.advance();
                let (name, _, _) = self.expect_ident("a variable")?;
                self.expect(&Token::Pipe, "'|'")?;
                Ok(Expr::SizeOf(Var::new(format!("autovar_{name}"))))
            }
            Some(Token::Minus) | Some(Token::Number(_)) => self.sized_number(),
            Some(Token::Ident(_)) => {
                let (name, _, _) = self.expect_ident("a variable")?;
                Ok(Expr::Var(Var::new(format!("autovar_{name}"))))
            }
            Some(other) => {
                let (line, col) = self.loc();
                Err(ParseError::UnexpectedToken {
                    line,
                    col,
                    expected: "a value",
                    found: describe(other),
                })
            }
            None => Err(self.eof_err("a value")),
        }
    }

    /// `sized_number := NUMBER [':' (NUMBER | sizeof)]`, NUMBER carrying an
    /// optional leading `-`.
    fn sized_number(&mut self) -> Result<Expr, ParseError> {
        let negative = self.match_token(&Token::Minus);
        let (line, col) = self.loc();
        let text = match self.advance() {
            Some(Token::Number(text)) => text,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    col,
                    expected: "a number",
                    found: describe(&other),
                })
            }
            None => return Err(self.eof_err("a number")),
        };
        let mut value = parse_number_text(&text, line, col)?;
        if negative {
            value = -value;
        }

        let size = if self.match_token(&Token::Colon) {
            match self.peek() {
                Some(Token::Pipe) => {
                    self.advance();
                    let (name, _, _) = self.expect_ident("a variable")?;
                    self.expect(&Token::Pipe, "'|'")?;
                    Size::SizeOf(Var::new(format!("autovar_{name}")))
                }
                Some(Token::Number(_)) => {
                    let (_, line, col) = (0, self.loc().0, self.loc().1);
                    let size_text = match self.advance() {
                        Some(Token::Number(t)) => t,
                        _ => unreachable!(),
                    };
                    let n = parse_number_text(&size_text, line, col)?;
                    Size::Literal(n as u64)
                }
                _ => {
                    let (line, col) = self.loc();
                    return Err(ParseError::UnexpectedToken {
                        line,
                        col,
                        expected: "a size annotation",
                        found: self.peek().map(describe).unwrap_or_else(|| "end of input".to_string()),
                    });
                }
            }
        } else {
            Size::default()
        };

        Ok(Expr::Number(Number::new(value, size)))
    }
}

fn parse_number_text(text: &str, line: usize, col: usize) -> Result<i64, ParseError> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        text.parse::<u64>()
    };
    parsed.map(|v| v as i64).map_err(|_| ParseError::InvalidNumber {
        line,
        col,
        token: text.to_string(),
    })
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) => format!("identifier '{s}'"),
        Token::Number(s) => format!("number '{s}'"),
        Token::Colon => "':'".to_string(),
        Token::ColonDash => "':-'".to_string(),
        Token::LBrace => "'{'".to_string(),
        Token::RBrace => "'}'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::FatArrow => "'=>'".to_string(),
        Token::Pipe => "'|'".to_string(),
        Token::Amp => "'&'".to_string(),
        Token::Caret => "'^'".to_string(),
        Token::Shl => "'<<'".to_string(),
        Token::Shr => "'>>'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Lt => "'<'".to_string(),
        Token::Gt => "'>'".to_string(),
        Token::Eq => "'='".to_string(),
    }
}

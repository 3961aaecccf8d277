//! Arithmetic over numeric composite values.
//!
//! A numeric composite such as `${myFloat} * ${myInteger}` is an expression
//! built from decimal literals, resolved references, `+ - * /`, unary minus,
//! and parentheses. Two operands with nothing between them are summed, so
//! `${base}${offset}` means `${base} + ${offset}`.

use std::fmt;

use thiserror::Error;

/// A number that takes part in an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Int(i64),
    Real(f64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(i) => write!(f, "{i}"),
            Operand::Real(r) => write!(f, "{r}"),
        }
    }
}

/// Input fragment of an expression: literal text or an already resolved
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece<'a> {
    Text(&'a str),
    Operand(Operand),
}

/// Arithmetic domain an expression is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Checked `i64` arithmetic with truncating division
    Integer,
    /// `f64` arithmetic
    Real,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("{0}")]
    Malformed(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("operand {0} is not an integer")]
    NotInteger(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(Operand),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn ends_operand(self) -> bool {
        matches!(self, Token::Number(_) | Token::RParen)
    }

    fn starts_operand(self) -> bool {
        matches!(self, Token::Number(_) | Token::LParen)
    }
}

/// Evaluate the expression formed by `pieces` in `domain`.
pub fn evaluate(pieces: &[Piece<'_>], domain: Domain) -> Result<Operand, ExprError> {
    let tokens = tokenize(pieces)?;
    if tokens.is_empty() {
        return Err(ExprError::Malformed("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        domain,
    };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(ExprError::Malformed(format!("unexpected {token:?}")));
    }
    tracing::trace!(?pieces, %value, "evaluated numeric expression");
    Ok(value)
}

fn tokenize(pieces: &[Piece<'_>]) -> Result<Vec<Token>, ExprError> {
    let mut tokens: Vec<Token> = Vec::new();

    for piece in pieces {
        match piece {
            Piece::Operand(operand) => push_token(&mut tokens, Token::Number(*operand)),
            Piece::Text(text) => {
                let chars: Vec<char> = text.chars().collect();
                let mut i = 0;
                while i < chars.len() {
                    let c = chars[i];
                    let token = match c {
                        c if c.is_whitespace() => {
                            i += 1;
                            continue;
                        }
                        '+' => Token::Plus,
                        '-' => Token::Minus,
                        '*' => Token::Star,
                        '/' => Token::Slash,
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        c if c.is_ascii_digit() || c == '.' => {
                            let (number, next) = scan_number(&chars, i)?;
                            i = next;
                            push_token(&mut tokens, Token::Number(number));
                            continue;
                        }
                        other => {
                            return Err(ExprError::Malformed(format!(
                                "unexpected character '{other}'"
                            )))
                        }
                    };
                    push_token(&mut tokens, token);
                    i += 1;
                }
            }
        }
    }
    Ok(tokens)
}

/// Append a token, inserting the implicit `+` between two operands.
fn push_token(tokens: &mut Vec<Token>, token: Token) {
    if tokens.last().is_some_and(|last| last.ends_operand()) && token.starts_operand() {
        tokens.push(Token::Plus);
    }
    tokens.push(token);
}

/// Scan a decimal literal (`142`, `322.0`, `.5`, `1e3`) starting at `start`.
fn scan_number(chars: &[char], start: usize) -> Result<(Operand, usize), ExprError> {
    let mut end = start;
    let mut is_real = false;

    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end < chars.len() && chars[end] == '.' {
        is_real = true;
        end += 1;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < chars.len() && matches!(chars[end], 'e' | 'E') {
        let mut exp_end = end + 1;
        if exp_end < chars.len() && matches!(chars[exp_end], '+' | '-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < chars.len() && chars[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            is_real = true;
            end = exp_end;
        }
    }

    let text: String = chars[start..end].iter().collect();
    let malformed = || ExprError::Malformed(format!("invalid number '{text}'"));
    let operand = if is_real {
        Operand::Real(text.parse::<f64>().map_err(|_| malformed())?)
    } else {
        Operand::Int(text.parse::<i64>().map_err(|_| ExprError::Overflow)?)
    };
    Ok((operand, end))
}

/// Deepest nesting of parentheses and unary signs an expression may use.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser that evaluates while it parses.
///
/// ```text
/// expr  := term (('+' | '-') term)*
/// term  := unary (('*' | '/') unary)*
/// unary := ('-' | '+') unary | primary
/// primary := number | '(' expr ')'
/// ```
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    domain: Domain,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::Malformed(format!(
                "expression nested deeper than {MAX_NESTING} levels"
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<Operand, ExprError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = self.apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Operand, ExprError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = self.apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<Operand, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let value = self.nested(Self::unary)?;
                self.apply(Token::Minus, self.zero(), value)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Operand, ExprError> {
        match self.next() {
            Some(Token::Number(operand)) => self.convert(operand),
            Some(Token::LParen) => {
                let value = self.nested(Self::expr)?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ExprError::Malformed("missing ')'".to_string())),
                }
            }
            Some(token) => Err(ExprError::Malformed(format!("unexpected {token:?}"))),
            None => Err(ExprError::Malformed("unexpected end of expression".to_string())),
        }
    }

    fn zero(&self) -> Operand {
        match self.domain {
            Domain::Integer => Operand::Int(0),
            Domain::Real => Operand::Real(0.0),
        }
    }

    fn convert(&self, operand: Operand) -> Result<Operand, ExprError> {
        match (self.domain, operand) {
            (Domain::Integer, Operand::Int(_)) => Ok(operand),
            (Domain::Integer, Operand::Real(r)) => Err(ExprError::NotInteger(r.to_string())),
            (Domain::Real, Operand::Int(i)) => Ok(Operand::Real(i as f64)),
            (Domain::Real, Operand::Real(_)) => Ok(operand),
        }
    }

    fn apply(&self, op: Token, lhs: Operand, rhs: Operand) -> Result<Operand, ExprError> {
        match (lhs, rhs) {
            (Operand::Int(a), Operand::Int(b)) => {
                let result = match op {
                    Token::Plus => a.checked_add(b),
                    Token::Minus => a.checked_sub(b),
                    Token::Star => a.checked_mul(b),
                    Token::Slash if b == 0 => return Err(ExprError::DivisionByZero),
                    Token::Slash => a.checked_div(b),
                    _ => unreachable!("apply is only called with operators"),
                };
                result.map(Operand::Int).ok_or(ExprError::Overflow)
            }
            (Operand::Real(a), Operand::Real(b)) => {
                let result = match op {
                    Token::Plus => a + b,
                    Token::Minus => a - b,
                    Token::Star => a * b,
                    Token::Slash if b == 0.0 => return Err(ExprError::DivisionByZero),
                    Token::Slash => a / b,
                    _ => unreachable!("apply is only called with operators"),
                };
                if result.is_finite() {
                    Ok(Operand::Real(result))
                } else {
                    Err(ExprError::NonFinite)
                }
            }
            // Operands are converted into the domain before they are combined.
            _ => unreachable!("mixed operands in one domain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval_text(text: &str, domain: Domain) -> Result<Operand, ExprError> {
        evaluate(&[Piece::Text(text)], domain)
    }

    #[test]
    fn test_combined_float_fixture() {
        let pieces = [
            Piece::Operand(Operand::Real(322.0)),
            Piece::Text(" * "),
            Piece::Operand(Operand::Int(142)),
        ];
        assert_eq!(evaluate(&pieces, Domain::Real).unwrap(), Operand::Real(45724.0));
    }

    #[test]
    fn test_precedence_and_parentheses() {
        assert_eq!(eval_text("1 + 2 * 3", Domain::Integer).unwrap(), Operand::Int(7));
        assert_eq!(eval_text("(1 + 2) * 3", Domain::Integer).unwrap(), Operand::Int(9));
        assert_eq!(eval_text("-(2 - 5)", Domain::Integer).unwrap(), Operand::Int(3));
        assert_eq!(eval_text("7 / 2", Domain::Integer).unwrap(), Operand::Int(3));
        assert_eq!(eval_text("-7 / 2", Domain::Integer).unwrap(), Operand::Int(-3));
        assert_eq!(eval_text("7 / 2", Domain::Real).unwrap(), Operand::Real(3.5));
        assert_eq!(eval_text("1.5e2 + .5", Domain::Real).unwrap(), Operand::Real(150.5));
    }

    #[test]
    fn test_adjacent_operands_are_summed() {
        let pieces = [
            Piece::Operand(Operand::Int(40)),
            Piece::Operand(Operand::Int(2)),
        ];
        assert_eq!(evaluate(&pieces, Domain::Integer).unwrap(), Operand::Int(42));

        let pieces = [Piece::Operand(Operand::Real(1.5)), Piece::Text(" 2")];
        assert_eq!(evaluate(&pieces, Domain::Real).unwrap(), Operand::Real(3.5));
    }

    #[test]
    fn test_integer_domain_rejects_reals() {
        let pieces = [Piece::Operand(Operand::Real(1.5)), Piece::Text("+ 1")];
        assert!(matches!(
            evaluate(&pieces, Domain::Integer),
            Err(ExprError::NotInteger(_))
        ));
    }

    #[test]
    fn test_arithmetic_failures() {
        assert_eq!(eval_text("1 / 0", Domain::Integer), Err(ExprError::DivisionByZero));
        assert_eq!(eval_text("1 / 0", Domain::Real), Err(ExprError::DivisionByZero));
        assert_eq!(
            eval_text("9223372036854775807 + 1", Domain::Integer),
            Err(ExprError::Overflow)
        );
        assert_eq!(eval_text("1e308 * 10", Domain::Real), Err(ExprError::NonFinite));
    }

    #[test]
    fn test_malformed_expressions() {
        for text in ["", "1 +", "(1", "1 )", "2 ^ 3", "abc", "* 2"] {
            assert!(
                matches!(eval_text(text, Domain::Real), Err(ExprError::Malformed(_))),
                "expected '{text}' to be rejected"
            );
        }
    }

    #[test]
    fn test_nesting_is_bounded() {
        let depth = MAX_NESTING;
        let ok = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval_text(&ok, Domain::Integer).unwrap(), Operand::Int(1));

        let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            eval_text(&deep, Domain::Integer),
            Err(ExprError::Malformed(_))
        ));

        let signs = format!("{}1", "-".repeat(100_000));
        assert!(matches!(
            eval_text(&signs, Domain::Integer),
            Err(ExprError::Malformed(_))
        ));
        assert_eq!(eval_text("--1", Domain::Integer).unwrap(), Operand::Int(1));
    }
}

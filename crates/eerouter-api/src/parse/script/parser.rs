// Recursive-descent parser for the network-status script.
//
// Accepts the statement and expression forms that appear in router-served
// scripts. Operator precedence is not modelled: binary chains are folded
// left to right, which is enough to locate declarations and literals.

use super::ast::{Declarator, Expr, Function, Program, Property, Stmt};
use super::lexer::{Token, TokenKind, tokenize};
use crate::parse::ParseError;

const MAX_DEPTH: usize = 256;

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

const BINARY_OPS: &[&str] = &[
    "||", "&&", "??", "|", "^", "&", "==", "!=", "===", "!==", "<", ">", "<=", ">=", "<<", ">>",
    ">>>", "+", "-", "*", "/", "%", "**",
];

const PREFIX_OPS: &[&str] = &["!", "~", "+", "-", "++", "--"];

const PREFIX_KEYWORDS: &[&str] = &["typeof", "void", "delete", "await"];

pub fn parse(src: &str) -> Result<Program, ParseError> {
    let mut parser = Parser {
        tokens: tokenize(src)?,
        pos: 0,
        depth: 0,
    };
    let mut body = Vec::new();
    while !parser.at_eof() {
        body.push(parser.statement()?);
    }
    Ok(Program { body })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    // ── Token helpers ───────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> TokenKind {
        let kind = self.peek().kind.clone();
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        kind
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn is_punct(&self, punct: &str) -> bool {
        matches!(self.peek().kind, TokenKind::Punct(p) if p == punct)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        let found = self.is_punct(punct);
        if found {
            self.pos += 1;
        }
        found
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.is_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_punct(&mut self, punct: &str) -> Result<(), ParseError> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{punct}`")))
        }
    }

    fn ident(&mut self) -> Result<String, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match &token.kind {
            TokenKind::Eof => "end of input".to_owned(),
            TokenKind::Ident(name) => format!("`{name}`"),
            TokenKind::Punct(p) => format!("`{p}`"),
            TokenKind::Str { raw, .. } => raw.clone(),
            TokenKind::Num(n) => n.clone(),
            TokenKind::Regex(_) => "regular expression".to_owned(),
            TokenKind::Template(_) => "template literal".to_owned(),
        };
        ParseError::Syntax {
            line: token.line,
            column: token.column,
            message: format!("expected {expected}, found {found}"),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let token = self.peek();
            return Err(ParseError::Syntax {
                line: token.line,
                column: token.column,
                message: "nesting too deep".to_owned(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Charge one more link of a left-folded chain against the depth
    /// budget. Callers restore `depth` once the chain is complete.
    fn extend_chain(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let token = self.peek();
            return Err(ParseError::Syntax {
                line: token.line,
                column: token.column,
                message: "expression too long".to_owned(),
            });
        }
        Ok(())
    }

    /// Consume a statement terminator, inserting one where a line break,
    /// a closing brace or the end of input allows it.
    fn end_statement(&mut self) -> Result<(), ParseError> {
        if self.eat_punct(";") || self.is_punct("}") || self.at_eof() || self.peek().newline_before
        {
            Ok(())
        } else {
            Err(self.unexpected("`;`"))
        }
    }

    fn can_end_statement(&self) -> bool {
        self.is_punct(";") || self.is_punct("}") || self.at_eof() || self.peek().newline_before
    }

    // ── Statements ──────────────────────────────────────────────────

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        self.enter()?;
        let stmt = self.statement_inner();
        self.leave();
        stmt
    }

    fn statement_inner(&mut self) -> Result<Stmt, ParseError> {
        if self.eat_punct(";") {
            return Ok(Stmt::Empty);
        }
        if self.is_punct("{") {
            return Ok(Stmt::Block(self.block()?));
        }

        let keyword = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            _ => return self.expression_statement(),
        };

        match keyword.as_str() {
            "var" | "const" => {
                self.bump();
                let decls = self.declarations()?;
                self.end_statement()?;
                Ok(Stmt::Var(decls))
            }
            "let" if matches!(self.peek_next().kind, TokenKind::Ident(_))
                || matches!(self.peek_next().kind, TokenKind::Punct("[" | "{")) =>
            {
                self.bump();
                let decls = self.declarations()?;
                self.end_statement()?;
                Ok(Stmt::Var(decls))
            }
            "function" => {
                self.bump();
                Ok(Stmt::Function(self.function()?))
            }
            "if" => {
                self.bump();
                let test = self.paren_expression()?;
                let mut body = vec![self.statement()?];
                if self.eat_keyword("else") {
                    body.push(self.statement()?);
                }
                Ok(Stmt::Compound {
                    exprs: vec![test],
                    body,
                })
            }
            "for" => {
                self.bump();
                self.for_statement()
            }
            "while" => {
                self.bump();
                let test = self.paren_expression()?;
                Ok(Stmt::Compound {
                    exprs: vec![test],
                    body: vec![self.statement()?],
                })
            }
            "do" => {
                self.bump();
                let body = vec![self.statement()?];
                if !self.eat_keyword("while") {
                    return Err(self.unexpected("`while`"));
                }
                let test = self.paren_expression()?;
                self.eat_punct(";");
                Ok(Stmt::Compound {
                    exprs: vec![test],
                    body,
                })
            }
            "return" | "throw" => {
                self.bump();
                let mut exprs = Vec::new();
                if !self.can_end_statement() {
                    exprs.push(self.expression()?);
                }
                self.end_statement()?;
                Ok(Stmt::Compound {
                    exprs,
                    body: Vec::new(),
                })
            }
            "break" | "continue" => {
                self.bump();
                if !self.peek().newline_before && matches!(self.peek().kind, TokenKind::Ident(_)) {
                    self.bump();
                }
                self.end_statement()?;
                Ok(Stmt::Empty)
            }
            "try" => {
                self.bump();
                self.try_statement()
            }
            "switch" => {
                self.bump();
                self.switch_statement()
            }
            _ if matches!(self.peek_next().kind, TokenKind::Punct(":")) => {
                // label
                self.bump();
                self.bump();
                Ok(Stmt::Compound {
                    exprs: Vec::new(),
                    body: vec![self.statement()?],
                })
            }
            _ => self.expression_statement(),
        }
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.end_statement()?;
        Ok(Stmt::Expr(expr))
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.eat_punct("}") {
            if self.at_eof() {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.statement()?);
        }
        Ok(body)
    }

    /// Declarator list after `var`, `let` or `const`.
    fn declarations(&mut self) -> Result<Vec<Declarator>, ParseError> {
        let mut decls = Vec::new();
        loop {
            let name = if self.is_punct("[") || self.is_punct("{") {
                // Destructuring pattern: keep it walkable, it has no single name.
                self.primary()?;
                String::new()
            } else {
                self.ident()?
            };
            let init = if self.eat_punct("=") {
                Some(self.assignment()?)
            } else {
                None
            };
            decls.push(Declarator { name, init });
            if !self.eat_punct(",") {
                return Ok(decls);
            }
        }
    }

    fn paren_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("(")?;
        let expr = self.expression()?;
        self.expect_punct(")")?;
        Ok(expr)
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.eat_keyword("await");
        self.expect_punct("(")?;
        let mut exprs = Vec::new();
        let mut body = Vec::new();

        if self.is_keyword("var") || self.is_keyword("let") || self.is_keyword("const") {
            self.bump();
            body.push(Stmt::Var(self.declarations()?));
        } else if !self.is_punct(";") {
            exprs.push(self.expression()?);
        }

        // `for (k in obj)` already folded into a binary `in` above.
        let folded_in = body.is_empty()
            && self.is_punct(")")
            && matches!(exprs.as_slice(), [Expr::Binary { op, .. }] if op == "in");

        if self.eat_keyword("of") || self.eat_keyword("in") {
            exprs.push(self.expression()?);
        } else if !folded_in {
            self.expect_punct(";")?;
            if !self.is_punct(";") {
                exprs.push(self.expression()?);
            }
            self.expect_punct(";")?;
            if !self.is_punct(")") {
                exprs.push(self.expression()?);
            }
        }
        self.expect_punct(")")?;
        body.push(self.statement()?);
        Ok(Stmt::Compound { exprs, body })
    }

    fn try_statement(&mut self) -> Result<Stmt, ParseError> {
        let mut exprs = Vec::new();
        let mut body = vec![Stmt::Block(self.block()?)];
        if self.eat_keyword("catch") {
            if self.eat_punct("(") {
                exprs.push(self.assignment()?);
                self.expect_punct(")")?;
            }
            body.push(Stmt::Block(self.block()?));
        }
        if self.eat_keyword("finally") {
            body.push(Stmt::Block(self.block()?));
        }
        if body.len() == 1 {
            return Err(self.unexpected("`catch` or `finally`"));
        }
        Ok(Stmt::Compound { exprs, body })
    }

    fn switch_statement(&mut self) -> Result<Stmt, ParseError> {
        let mut exprs = vec![self.paren_expression()?];
        let mut body = Vec::new();
        self.expect_punct("{")?;
        while !self.eat_punct("}") {
            if self.eat_keyword("case") {
                exprs.push(self.expression()?);
                self.expect_punct(":")?;
            } else if self.eat_keyword("default") {
                self.expect_punct(":")?;
            } else if self.at_eof() {
                return Err(self.unexpected("`}`"));
            } else {
                body.push(self.statement()?);
            }
        }
        Ok(Stmt::Compound { exprs, body })
    }

    /// Function after the `function` keyword: optional name, params, body.
    fn function(&mut self) -> Result<Function, ParseError> {
        self.eat_punct("*");
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.bump();
                Some(name)
            }
            _ => None,
        };
        let params = self.params()?;
        let body = self.block()?;
        Ok(Function { name, params, body })
    }

    fn params(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.eat_punct(")") {
            if self.eat_punct("...") {
                params.push(Expr::Spread(Box::new(self.assignment()?)));
            } else {
                params.push(self.assignment()?);
            }
            if !self.eat_punct(",") {
                self.expect_punct(")")?;
                break;
            }
        }
        Ok(params)
    }

    // ── Expressions ─────────────────────────────────────────────────

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let first = self.assignment()?;
        if !self.is_punct(",") {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat_punct(",") {
            exprs.push(self.assignment()?);
        }
        Ok(Expr::Sequence(exprs))
    }

    fn assignment(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.assignment_inner();
        self.leave();
        expr
    }

    fn assignment_inner(&mut self) -> Result<Expr, ParseError> {
        // `x => ...`
        if let TokenKind::Ident(name) = &self.peek().kind {
            if matches!(self.peek_next().kind, TokenKind::Punct("=>")) {
                let param = Expr::Ident(name.clone());
                self.bump();
                self.bump();
                return self.arrow_body(vec![param]);
            }
        }

        let target = self.conditional()?;
        let op = match self.peek().kind {
            TokenKind::Punct(p) if ASSIGN_OPS.contains(&p) => p,
            _ => return Ok(target),
        };
        self.bump();
        let value = self.assignment()?;
        Ok(Expr::Assign {
            op: op.to_owned(),
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    fn arrow_body(&mut self, params: Vec<Expr>) -> Result<Expr, ParseError> {
        let body = if self.is_punct("{") {
            self.block()?
        } else {
            vec![Stmt::Expr(self.assignment()?)]
        };
        Ok(Expr::Function(Box::new(Function {
            name: None,
            params,
            body,
        })))
    }

    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.binary()?;
        if !self.eat_punct("?") {
            return Ok(test);
        }
        let consequent = self.assignment()?;
        self.expect_punct(":")?;
        let alternate = self.assignment()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn binary(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let chain = self.binary_chain();
        self.depth = depth;
        chain
    }

    fn binary_chain(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Punct(p) if BINARY_OPS.contains(p) => (*p).to_owned(),
                TokenKind::Ident(kw) if kw == "in" || kw == "instanceof" => kw.clone(),
                _ => return Ok(left),
            };
            self.extend_chain()?;
            self.bump();
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.peek().kind {
            TokenKind::Punct(p) if PREFIX_OPS.contains(p) => Some((*p).to_owned()),
            TokenKind::Ident(kw) if PREFIX_KEYWORDS.contains(&kw.as_str()) => Some(kw.clone()),
            _ => None,
        };
        let Some(op) = op else {
            return self.postfix();
        };
        self.bump();
        self.enter()?;
        let operand = self.unary();
        self.leave();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.call_member()?;
        if !self.peek().newline_before && (self.is_punct("++") || self.is_punct("--")) {
            let op = match self.bump() {
                TokenKind::Punct(p) => p.to_owned(),
                _ => String::new(),
            };
            return Ok(Expr::Unary {
                op,
                operand: Box::new(expr),
            });
        }
        Ok(expr)
    }

    fn call_member(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let chain = self.call_member_chain();
        self.depth = depth;
        chain
    }

    fn call_member_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = if self.eat_keyword("new") {
            self.enter()?;
            let callee = self.call_member();
            self.leave();
            match callee? {
                call @ Expr::Call { .. } => call,
                callee => Expr::Call {
                    callee: Box::new(callee),
                    args: Vec::new(),
                },
            }
        } else {
            self.primary()?
        };

        loop {
            if self.eat_punct(".") || self.eat_punct("?.") {
                if self.is_punct("(") || self.is_punct("[") {
                    continue;
                }
                self.extend_chain()?;
                let property = Expr::Ident(self.ident()?);
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                };
            } else if self.eat_punct("[") {
                self.extend_chain()?;
                let property = self.expression()?;
                self.expect_punct("]")?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                };
            } else if self.is_punct("(") {
                self.extend_chain()?;
                let args = self.params()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if let TokenKind::Template(body) = &self.peek().kind {
                let tagged = Expr::Template(body.clone());
                self.extend_chain()?;
                self.bump();
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args: vec![tagged],
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.primary_inner();
        self.leave();
        expr
    }

    fn primary_inner(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident(name) if name == "function" => {
                self.bump();
                Ok(Expr::Function(Box::new(self.function()?)))
            }
            TokenKind::Ident(name) if name == "async" => {
                self.bump();
                if self.is_keyword("function") || self.is_punct("(") {
                    self.primary()
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            TokenKind::Ident(name) => {
                self.bump();
                Ok(Expr::Ident(name))
            }
            TokenKind::Str { raw, value } => {
                self.bump();
                Ok(Expr::Str { raw, value })
            }
            TokenKind::Num(text) => {
                self.bump();
                Ok(Expr::Num(text))
            }
            TokenKind::Regex(text) => {
                self.bump();
                Ok(Expr::Regex(text))
            }
            TokenKind::Template(body) => {
                self.bump();
                Ok(Expr::Template(body))
            }
            TokenKind::Punct("(") => self.parenthesized(),
            TokenKind::Punct("[") => self.array(),
            TokenKind::Punct("{") => self.object(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `( ... )`, which may turn out to be an arrow function's parameters.
    fn parenthesized(&mut self) -> Result<Expr, ParseError> {
        let params = self.params()?;
        if self.eat_punct("=>") {
            return self.arrow_body(params);
        }
        match <[Expr; 1]>::try_from(params) {
            Ok([expr]) => Ok(expr),
            Err(params) if params.is_empty() => Err(self.unexpected("`=>`")),
            Err(params) => Ok(Expr::Sequence(params)),
        }
    }

    fn array(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("[")?;
        let mut items = Vec::new();
        loop {
            if self.eat_punct("]") {
                return Ok(Expr::Array(items));
            }
            if self.eat_punct(",") {
                items.push(None);
                continue;
            }
            let item = if self.eat_punct("...") {
                Expr::Spread(Box::new(self.assignment()?))
            } else {
                self.assignment()?
            };
            items.push(Some(item));
            if !self.eat_punct(",") {
                self.expect_punct("]")?;
                return Ok(Expr::Array(items));
            }
        }
    }

    fn object(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("{")?;
        let mut props = Vec::new();
        while !self.eat_punct("}") {
            if self.eat_punct("...") {
                let spread = self.assignment()?;
                props.push(Property {
                    key: String::new(),
                    value: Expr::Spread(Box::new(spread)),
                });
            } else {
                props.push(self.property()?);
            }
            if !self.eat_punct(",") {
                self.expect_punct("}")?;
                break;
            }
        }
        Ok(Expr::Object(props))
    }

    fn property_key(&mut self) -> Result<String, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.bump();
                Ok(name)
            }
            TokenKind::Str { value, .. } => {
                self.bump();
                Ok(value)
            }
            TokenKind::Num(text) => {
                self.bump();
                Ok(text)
            }
            TokenKind::Punct("[") => {
                // computed key
                self.bump();
                self.assignment()?;
                self.expect_punct("]")?;
                Ok(String::new())
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    fn property(&mut self) -> Result<Property, ParseError> {
        let accessor = (self.is_keyword("get") || self.is_keyword("set") || self.is_keyword("async"))
            && !matches!(self.peek_next().kind, TokenKind::Punct(":" | "," | "}" | "(" | "="));
        if accessor {
            self.bump();
        }
        self.eat_punct("*");

        let key = self.property_key()?;

        if self.eat_punct(":") {
            let value = self.assignment()?;
            return Ok(Property { key, value });
        }
        if self.is_punct("(") {
            let params = self.params()?;
            let body = self.block()?;
            return Ok(Property {
                value: Expr::Function(Box::new(Function {
                    name: Some(key.clone()),
                    params,
                    body,
                })),
                key,
            });
        }

        // shorthand, optionally with a default inside a pattern
        let mut value = Expr::Ident(key.clone());
        if self.eat_punct("=") {
            value = Expr::Assign {
                op: "=".to_owned(),
                target: Box::new(value),
                value: Box::new(self.assignment()?),
            };
        }
        Ok(Property { key, value })
    }
}

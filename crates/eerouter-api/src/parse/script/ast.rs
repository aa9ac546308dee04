// Syntax tree for the network-status script
//
// Control-flow statements are kept only as containers of the expressions and
// statements inside them; extraction never needs their exact shape.

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(Vec<Declarator>),
    Expr(Expr),
    Block(Vec<Stmt>),
    Function(Function),
    /// `if`, loops, `return`, `throw`, `switch`, `try` and labelled
    /// statements, reduced to their parts in source order.
    Compound {
        exprs: Vec<Expr>,
        body: Vec<Stmt>,
    },
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// `key: value` inside an object literal. Shorthand and method
/// properties are normalised to the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str { raw: String, value: String },
    Num(String),
    Ident(String),
    Regex(String),
    Template(String),
    Object(Vec<Property>),
    /// Array literal; holes are `None`.
    Array(Vec<Option<Expr>>),
    Function(Box<Function>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Sequence(Vec<Expr>),
    Spread(Box<Expr>),
}

/// Borrowed view of any tree node, for generic traversal.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    Declarator(&'a Declarator),
    Property(&'a Property),
}

impl<'a> Node<'a> {
    fn children(self) -> Vec<Node<'a>> {
        match self {
            Node::Stmt(stmt) => match stmt {
                Stmt::Var(decls) => decls.iter().map(Node::Declarator).collect(),
                Stmt::Expr(expr) => vec![Node::Expr(expr)],
                Stmt::Block(body) => body.iter().map(Node::Stmt).collect(),
                Stmt::Function(function) => function_children(function),
                Stmt::Compound { exprs, body } => exprs
                    .iter()
                    .map(Node::Expr)
                    .chain(body.iter().map(Node::Stmt))
                    .collect(),
                Stmt::Empty => Vec::new(),
            },
            Node::Declarator(decl) => decl.init.iter().map(Node::Expr).collect(),
            Node::Property(prop) => vec![Node::Expr(&prop.value)],
            Node::Expr(expr) => match expr {
                Expr::Str { .. }
                | Expr::Num(_)
                | Expr::Ident(_)
                | Expr::Regex(_)
                | Expr::Template(_) => Vec::new(),
                Expr::Object(props) => props.iter().map(Node::Property).collect(),
                Expr::Array(items) => items.iter().flatten().map(Node::Expr).collect(),
                Expr::Function(function) => function_children(function),
                Expr::Call { callee, args } => std::iter::once(Node::Expr(&**callee))
                    .chain(args.iter().map(Node::Expr))
                    .collect(),
                Expr::Member { object, property } => {
                    vec![Node::Expr(object), Node::Expr(property)]
                }
                Expr::Unary { operand, .. } | Expr::Spread(operand) => vec![Node::Expr(operand)],
                Expr::Binary { left, right, .. } => vec![Node::Expr(left), Node::Expr(right)],
                Expr::Assign { target, value, .. } => vec![Node::Expr(target), Node::Expr(value)],
                Expr::Conditional {
                    test,
                    consequent,
                    alternate,
                } => vec![
                    Node::Expr(test),
                    Node::Expr(consequent),
                    Node::Expr(alternate),
                ],
                Expr::Sequence(exprs) => exprs.iter().map(Node::Expr).collect(),
            },
        }
    }
}

fn function_children(function: &Function) -> Vec<Node<'_>> {
    function
        .params
        .iter()
        .map(Node::Expr)
        .chain(function.body.iter().map(Node::Stmt))
        .collect()
}

/// Visit `root` and all of its descendants in pre-order (document order).
pub fn walk<'a>(root: Node<'a>, mut visit: impl FnMut(Node<'a>)) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visit(node);
        stack.extend(node.children().into_iter().rev());
    }
}

impl Program {
    /// Visit every node of the program in pre-order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(Node<'a>)) {
        for stmt in &self.body {
            walk(Node::Stmt(stmt), &mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.into())
    }

    #[test]
    fn walk_is_pre_order() {
        let expr = Expr::Binary {
            op: "+".into(),
            left: Box::new(Expr::Call {
                callee: Box::new(ident("f")),
                args: vec![ident("a")],
            }),
            right: Box::new(ident("b")),
        };
        let mut seen = Vec::new();
        walk(Node::Expr(&expr), |node| {
            if let Node::Expr(Expr::Ident(name)) = node {
                seen.push(name.clone());
            }
        });
        assert_eq!(seen, ["f", "a", "b"]);
    }

    #[test]
    fn walk_enters_declarators_and_properties() {
        let program = Program {
            body: vec![Stmt::Var(vec![Declarator {
                name: "x".into(),
                init: Some(Expr::Object(vec![Property {
                    key: "k".into(),
                    value: Expr::Num("1".into()),
                }])),
            }])],
        };
        let mut keys = Vec::new();
        program.walk(|node| {
            if let Node::Property(prop) = node {
                keys.push(prop.key.clone());
            }
        });
        assert_eq!(keys, ["k"]);
    }
}

// AST definitions for the statement language

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Expressions evaluate to an `i32`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Id(String),
    Number(i32),
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

/// Statements update the symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assign {
        variable: String,
        value: Expression,
    },
    Block(Vec<Statement>),
    Branch {
        predicate: Expression,
        then_branch: Box<Statement>,
        else_branch: Box<Statement>,
    },
    Loop {
        predicate: Expression,
        body: Box<Statement>,
    },
}

pub fn id(name: &str) -> Expression {
    Expression::Id(name.to_string())
}

pub fn number(n: i32) -> Expression {
    Expression::Number(n)
}

fn binary(op: BinOp, left: Expression, right: Expression) -> Expression {
    Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn plus(left: Expression, right: Expression) -> Expression {
    binary(BinOp::Add, left, right)
}

pub fn minus(left: Expression, right: Expression) -> Expression {
    binary(BinOp::Sub, left, right)
}

pub fn times(left: Expression, right: Expression) -> Expression {
    binary(BinOp::Mul, left, right)
}

pub fn divide(left: Expression, right: Expression) -> Expression {
    binary(BinOp::Div, left, right)
}

/// `variable = value`
pub fn assign(variable: &str, value: Expression) -> Statement {
    Statement::Assign {
        variable: variable.to_string(),
        value,
    }
}

pub fn block(statements: Vec<Statement>) -> Statement {
    Statement::Block(statements)
}

pub fn branch(predicate: Expression, then_branch: Statement, else_branch: Statement) -> Statement {
    Statement::Branch {
        predicate,
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    }
}

pub fn loop_while(predicate: Expression, body: Statement) -> Statement {
    Statement::Loop {
        predicate,
        body: Box::new(body),
    }
}

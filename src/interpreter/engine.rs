// Execution engine for the statement language

use crate::config::InterpreterConfig;
use crate::interpreter::ast::{BinOp, Expression, Statement};
use crate::interpreter::errors::RuntimeError;
use crate::snapshot::{EstimatedSize, SnapshotManager};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use tracing::{debug, trace};

/// Symbol table captured after one assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSnapshot {
    /// How many assignments had run when this was taken (1-based)
    pub step: usize,
    pub symbols: Vec<(String, i32)>,
}

impl EstimatedSize for SymbolSnapshot {
    fn estimated_size(&self) -> usize {
        self.symbols
            .iter()
            .map(|(name, _)| name.len() + std::mem::size_of::<i32>())
            .sum::<usize>()
            + std::mem::size_of::<usize>()
    }
}

/// Tree-walking interpreter over a flat symbol table
pub struct Interpreter {
    /// Variable name -> value
    symbols: FxHashMap<String, i32>,

    /// Names in first-assignment order
    insertion_order: Vec<String>,

    config: InterpreterConfig,

    /// Per-assignment history, present when `record_history` is set
    history: Option<SnapshotManager<SymbolSnapshot>>,

    /// Assignments executed so far
    steps: usize,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        let history = config
            .record_history
            .then(|| SnapshotManager::new(config.history_memory_limit));
        Interpreter {
            symbols: FxHashMap::default(),
            insertion_order: Vec::new(),
            config,
            history,
            steps: 0,
        }
    }

    /// Run a program to completion
    pub fn run(&mut self, program: &Statement) -> Result<(), RuntimeError> {
        self.execute_statement(program)?;
        debug!(
            assignments = self.steps,
            symbols = self.insertion_order.len(),
            "program finished"
        );
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Statement) -> Result<(), RuntimeError> {
        match stmt {
            Statement::Assign { variable, value } => {
                let value = self.evaluate(value)?;
                self.store(variable, value)
            }

            Statement::Block(statements) => {
                for s in statements {
                    self.execute_statement(s)?;
                }
                Ok(())
            }

            Statement::Branch {
                predicate,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(predicate)? != 0 {
                    self.execute_statement(then_branch)
                } else {
                    self.execute_statement(else_branch)
                }
            }

            Statement::Loop { predicate, body } => self.execute_loop(predicate, body),
        }
    }

    fn execute_loop(&mut self, predicate: &Expression, body: &Statement) -> Result<(), RuntimeError> {
        let limit = self.config.max_loop_iterations;
        let mut iterations = 0usize;

        while self.evaluate(predicate)? != 0 {
            if iterations == limit {
                return Err(RuntimeError::LoopLimitExceeded { limit });
            }
            iterations += 1;
            self.execute_statement(body)?;
        }

        trace!(iterations, "loop exited");
        Ok(())
    }

    fn store(&mut self, name: &str, value: i32) -> Result<(), RuntimeError> {
        if self.symbols.insert(name.to_string(), value).is_none() {
            self.insertion_order.push(name.to_string());
        }
        self.steps += 1;
        trace!(name, value, "assign");

        if let Some(history) = self.history.as_mut() {
            let symbols = self
                .insertion_order
                .iter()
                .map(|n| (n.clone(), self.symbols[n]))
                .collect();
            history.push(SymbolSnapshot {
                step: self.steps,
                symbols,
            })?;
        }
        Ok(())
    }

    /// Evaluate an expression against the current symbol table.
    /// Unknown identifiers read as 0.
    pub fn evaluate(&self, expr: &Expression) -> Result<i32, RuntimeError> {
        match expr {
            Expression::Id(name) => Ok(self.symbols.get(name).copied().unwrap_or(0)),
            Expression::Number(n) => Ok(*n),
            Expression::Binary { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                apply(*op, left, right)
            }
        }
    }

    /// Current value of a variable, if it has been assigned
    pub fn get(&self, name: &str) -> Option<i32> {
        self.symbols.get(name).copied()
    }

    /// All variables in first-assignment order
    pub fn symbols(&self) -> Vec<(&str, i32)> {
        self.insertion_order
            .iter()
            .map(|n| (n.as_str(), self.symbols[n]))
            .collect()
    }

    /// `name: value` lines, one per variable
    pub fn render_symbols(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.symbols() {
            let _ = writeln!(out, "{}: {}", name, value);
        }
        out
    }

    pub fn history(&self) -> Option<&SnapshotManager<SymbolSnapshot>> {
        self.history.as_ref()
    }

    /// Number of assignments executed
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

fn apply(op: BinOp, left: i32, right: i32) -> Result<i32, RuntimeError> {
    let result = match op {
        BinOp::Add => left.checked_add(right),
        BinOp::Sub => left.checked_sub(right),
        BinOp::Mul => left.checked_mul(right),
        BinOp::Div => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero { left });
            }
            // i32::MIN / -1 is the only overflowing case
            left.checked_div(right)
        }
    };
    result.ok_or(RuntimeError::IntegerOverflow { op, left, right })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::ast::*;

    #[test]
    fn test_unknown_identifier_reads_zero() {
        let interp = Interpreter::default();
        assert_eq!(interp.evaluate(&plus(id("nope"), number(3))), Ok(3));
    }

    #[test]
    fn test_divide_divides() {
        let interp = Interpreter::default();
        assert_eq!(interp.evaluate(&divide(number(20), number(4))), Ok(5));
        assert_eq!(interp.evaluate(&divide(number(-7), number(2))), Ok(-3));
    }

    #[test]
    fn test_division_by_zero() {
        let interp = Interpreter::default();
        assert_eq!(
            interp.evaluate(&divide(number(1), number(0))),
            Err(RuntimeError::DivisionByZero { left: 1 })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let interp = Interpreter::default();
        assert_eq!(
            interp.evaluate(&times(number(i32::MAX), number(2))),
            Err(RuntimeError::IntegerOverflow {
                op: BinOp::Mul,
                left: i32::MAX,
                right: 2
            })
        );
        assert!(interp
            .evaluate(&divide(number(i32::MIN), number(-1)))
            .is_err());
    }

    #[test]
    fn test_branch_takes_else_on_zero() {
        let mut interp = Interpreter::default();
        interp
            .run(&branch(number(0), assign("x", number(1)), assign("x", number(2))))
            .unwrap();
        assert_eq!(interp.get("x"), Some(2));
    }

    #[test]
    fn test_loop_limit() {
        let config = InterpreterConfig::default().with_max_loop_iterations(10);
        let mut interp = Interpreter::new(config);
        let forever = loop_while(number(1), assign("x", plus(id("x"), number(1))));
        assert_eq!(
            interp.run(&forever),
            Err(RuntimeError::LoopLimitExceeded { limit: 10 })
        );
        assert_eq!(interp.get("x"), Some(10));
    }

    #[test]
    fn test_reassignment_keeps_first_position() {
        let mut interp = Interpreter::default();
        interp
            .run(&block(vec![
                assign("a", number(1)),
                assign("b", number(2)),
                assign("a", number(3)),
            ]))
            .unwrap();
        assert_eq!(interp.symbols(), vec![("a", 3), ("b", 2)]);
        assert_eq!(interp.render_symbols(), "a: 3\nb: 2\n");
        assert_eq!(interp.steps(), 3);
    }

    #[test]
    fn test_history_records_each_assignment() {
        let mut interp = Interpreter::new(InterpreterConfig::default().with_history());
        interp
            .run(&block(vec![assign("a", number(1)), assign("b", id("a"))]))
            .unwrap();
        let history = interp.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.get(0).unwrap().symbols,
            vec![("a".to_string(), 1)]
        );
        assert_eq!(
            history.last().unwrap().symbols,
            vec![("a".to_string(), 1), ("b".to_string(), 1)]
        );
    }

    #[test]
    fn test_history_limit() {
        let config = InterpreterConfig {
            record_history: true,
            history_memory_limit: 1,
            ..InterpreterConfig::default()
        };
        let mut interp = Interpreter::new(config);
        assert!(matches!(
            interp.run(&assign("a", number(1))),
            Err(RuntimeError::History(_))
        ));
    }
}

//! Reference programs built with the [`ast`](super::ast) constructors.

use super::ast::*;

/// Computes 5! into `factorial`:
///
/// ```text
/// factorial = 1;
/// i = 5;
/// while (i) {
///     factorial = factorial * i;
///     i = i - 1;
/// }
/// ```
pub fn factorial() -> Statement {
    factorial_of(5)
}

/// Same as [`factorial`] for an arbitrary starting `i`
pub fn factorial_of(n: i32) -> Statement {
    block(vec![
        assign("factorial", number(1)),
        assign("i", number(n)),
        loop_while(
            id("i"),
            block(vec![
                assign("factorial", times(id("factorial"), id("i"))),
                assign("i", minus(id("i"), number(1))),
            ]),
        ),
    ])
}

/// The textbook branch/loop example:
///
/// ```text
/// if (x + y) {
///     while (z) z = z + 1;
///     x = 8;
/// } else {
///     z = 7;
/// }
/// ```
pub fn textbook() -> Statement {
    branch(
        plus(id("x"), id("y")),
        block(vec![
            loop_while(id("z"), assign("z", plus(id("z"), number(1)))),
            assign("x", number(8)),
        ]),
        assign("z", number(7)),
    )
}

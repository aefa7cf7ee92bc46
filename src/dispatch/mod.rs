//! Static vs. dynamic dispatch
//!
//! [`Speaker`] is the abstract capability and [`Cow`] its only variant.
//! [`invoke_speak`] calls through a `&dyn Speaker`, so the vtable picks the
//! implementation at runtime; [`invoke_speak_static`] is monomorphised and the
//! call is bound at compile time. Both end up in `Cow::speak`.
//!
//! A handle is always bound: `Box<dyn Speaker>` can only be built from a
//! concrete value, and a handle that may be absent has to be spelled
//! `Option<Box<dyn Speaker>>`.

use std::io::{self, Write};
use tracing::trace;

/// Something that can speak
///
/// A handle that was declared but never bound cannot be spoken to:
///
/// ```compile_fail,E0381
/// use inclass::dispatch::Speaker;
///
/// let sally: Box<dyn Speaker>;
/// sally.speak(&mut std::io::sink()).unwrap();
/// ```
///
/// Nor can the capability itself be built without a concrete speaker:
///
/// ```compile_fail
/// use inclass::dispatch::Speaker;
///
/// let bare: Box<dyn Speaker> = Box::new(Speaker);
/// ```
///
/// Only a concrete variant produces a handle:
///
/// ```
/// use inclass::dispatch::{invoke_speak, make_cow};
///
/// let mut out = Vec::new();
/// invoke_speak(make_cow().as_ref(), &mut out).unwrap();
/// assert_eq!(out, b"Moo\n");
/// ```
pub trait Speaker {
    /// Write this speaker's line to `out`
    fn speak(&self, out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cow;

impl Speaker for Cow {
    fn speak(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Moo")
    }
}

/// Construct a [`Cow`] behind the abstract capability
pub fn make_cow() -> Box<dyn Speaker> {
    Box::new(Cow)
}

/// Call `speak` through the vtable
pub fn invoke_speak(handle: &dyn Speaker, out: &mut dyn Write) -> io::Result<()> {
    trace!("dynamic dispatch");
    handle.speak(out)
}

/// Call `speak` on a statically known type
pub fn invoke_speak_static<S: Speaker + ?Sized>(
    speaker: &S,
    out: &mut dyn Write,
) -> io::Result<()> {
    trace!(speaker = std::any::type_name::<S>(), "static dispatch");
    speaker.speak(out)
}

/// The dispatch demo: one bound handle spoken to, one absent handle never touched
pub fn run(out: &mut dyn Write) -> io::Result<()> {
    let bessie = make_cow();
    let sally: Option<Box<dyn Speaker>> = None;

    invoke_speak(bessie.as_ref(), out)?;

    trace!(sally_bound = sally.is_some(), "dispatch demo done");
    Ok(())
}

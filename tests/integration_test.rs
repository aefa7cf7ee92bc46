// Integration tests for the dispatch and storage demos

use inclass::config::MemoryConfig;
use inclass::dispatch::{self, invoke_speak, invoke_speak_static, make_cow, Cow, Speaker};
use inclass::memory::errors::MemoryError;
use inclass::memory::value::Value;
use inclass::memory::Region;
use inclass::snapshot::Console;
use inclass::storage::trace::{Leak, Step};
use inclass::storage::{self, trace_demo, trace_leaky_demo};
use std::io::{self, Write};
use std::process::Command;

// A second variant, defined outside the crate, goes through the same call sites
struct Dog;

impl Speaker for Dog {
    fn speak(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Woof")
    }
}

#[test]
fn test_speak_through_abstract_handle() {
    let bessie: Box<dyn Speaker> = make_cow();
    let mut console = Console::new();
    invoke_speak(bessie.as_ref(), &mut console).unwrap();
    assert_eq!(console.as_str(), "Moo\n");
}

#[test]
fn test_dispatch_ignores_static_type_of_call_site() {
    let concrete = Cow;
    let erased: &dyn Speaker = &concrete;

    let mut outputs = Vec::new();
    for call in 0..4 {
        let mut console = Console::new();
        match call {
            0 => invoke_speak(&concrete, &mut console).unwrap(),
            1 => invoke_speak(erased, &mut console).unwrap(),
            2 => invoke_speak_static(&concrete, &mut console).unwrap(),
            _ => invoke_speak_static(erased, &mut console).unwrap(),
        }
        outputs.push(console.as_str().to_string());
    }

    assert!(outputs.iter().all(|o| o == "Moo\n"), "{:?}", outputs);
}

#[test]
fn test_new_variant_without_touching_call_sites() {
    let herd: Vec<Box<dyn Speaker>> = vec![make_cow(), Box::new(Dog), make_cow()];
    let mut console = Console::new();
    for animal in &herd {
        invoke_speak(animal.as_ref(), &mut console).unwrap();
    }
    assert_eq!(console.lines(), vec!["Moo", "Woof", "Moo"]);
}

#[test]
fn test_dispatch_demo_output() {
    let mut console = Console::new();
    dispatch::run(&mut console).unwrap();
    assert_eq!(console.as_str(), "Moo\n");
}

#[test]
fn test_global_observed_before_mutation() {
    // The only test in this binary that writes GLOBAL
    assert_eq!(storage::global(), 42);
    storage::demo();
    assert_eq!(storage::global(), 42);

    storage::set_global(7);
    assert_eq!(storage::global(), 7);
    storage::set_global(42);
}

#[test]
fn test_trace_bar_only_lives_inside_demo() {
    let trace = trace_demo(&MemoryConfig::default()).unwrap();
    let bar = trace.bar_address();
    assert_eq!(Region::of(bar), Region::Stack);

    let inside = trace.at(Step::DeclareBar).unwrap();
    assert_eq!(inside.read_int(bar), Ok(42));
    assert_eq!(inside.stack.get_var("bar").unwrap().value, Value::Int(42));

    let after = trace.at(Step::ReturnFromDemo).unwrap();
    assert_eq!(
        after.stack.current_frame().map(|f| f.function_name.as_str()),
        Some("main")
    );
    assert!(after.stack.get_var("bar").is_err());
    assert_eq!(
        after.read_int(bar),
        Err(MemoryError::InvalidAddress { address: bar })
    );
}

#[test]
fn test_trace_global_visible_at_every_step() {
    let trace = trace_demo(&MemoryConfig::default()).unwrap();
    let global = trace.global_address();
    assert_eq!(Region::of(global), Region::Global);
    for snapshot in trace.snapshots() {
        assert_eq!(snapshot.memory.read_int(global), Ok(42), "{}", snapshot.label);
    }
}

#[test]
fn test_trace_baz_indeterminate_until_written() {
    let trace = trace_demo(&MemoryConfig::default()).unwrap();
    let baz = trace.baz_address();
    assert_eq!(Region::of(baz), Region::Heap);

    let allocated = trace.at(Step::AllocateBaz).unwrap();
    assert_eq!(
        allocated.read_int(baz),
        Err(MemoryError::UninitializedRead { address: baz })
    );
    assert_eq!(
        allocated.stack.get_var("baz").unwrap().value.as_pointer(),
        Some(baz)
    );

    // Writing into a copy of that snapshot makes the cell readable
    let mut written = allocated.clone();
    written.write_int(baz, 42).unwrap();
    assert_eq!(written.read_int(baz), Ok(42));
}

#[test]
fn test_trace_baz_released_exactly_once() {
    let mut trace = trace_demo(&MemoryConfig::default()).unwrap();
    let baz = trace.baz_address();

    assert!(trace.leak_check().is_empty());
    assert_eq!(trace.final_memory().heap.live_bytes(), 0);
    assert_eq!(
        trace.final_memory().read_int(baz),
        Err(MemoryError::UseAfterFree { address: baz })
    );

    // A second release is caught
    assert_eq!(
        trace.final_memory_mut().heap.free(baz),
        Err(MemoryError::DoubleFree { address: baz })
    );
}

#[test]
fn test_literal_translation_leaks() {
    let trace = trace_leaky_demo(&MemoryConfig::default()).unwrap();
    assert_eq!(
        trace.leak_check(),
        vec![Leak {
            address: trace.baz_address(),
            size: 4
        }]
    );
    // The pointer itself died with the frame
    let after = trace.at(Step::ReturnFromDemo).unwrap();
    assert!(after.stack.get_var("baz").is_err());
}

#[test]
fn test_binary_prints_moo_and_exits_cleanly() {
    let output = Command::new(env!("CARGO_BIN_EXE_inclass"))
        .arg("ignored")
        .output()
        .expect("failed to run binary");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Moo\n");
    assert!(output.stderr.is_empty());
}

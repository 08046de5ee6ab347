use cellar::evaluator::Interpreter;
use cellar::value::Value;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::panic;
use std::process;

fn main() {
    let result = panic::catch_unwind(|| {
        run_repl();
    });

    if let Err(panic_info) = result {
        eprintln!("The REPL encountered an unexpected error and must exit.");

        if let Some(msg) = panic_info.downcast_ref::<&str>() {
            eprintln!("Error: {msg}");
        } else if let Some(msg) = panic_info.downcast_ref::<String>() {
            eprintln!("Error: {msg}");
        } else {
            eprintln!("Error: Unknown panic occurred");
        }

        process::exit(1);
    }
}

fn run_repl() {
    println!("Cellar - a Scheme subset with a store-based environment model");
    println!("Enter S-expressions like: (+ 1 2)");
    println!("Top-level definitions persist: (define x 3)");
    println!("Type :help for more commands, or Ctrl+C to exit.");
    println!();

    let mut rl = DefaultEditor::new().expect("Could not initialize REPL");
    let mut interp = Interpreter::new();

    loop {
        match rl.readline("cellar> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                // Add the line to history
                let _ = rl.add_history_entry(line);

                // Handle special commands
                match line {
                    ":help" => {
                        print_help();
                        continue;
                    }
                    ":env" => {
                        print_environment(&interp);
                        continue;
                    }
                    ":store" => {
                        println!("Store holds {} cells.", interp.store().len());
                        continue;
                    }
                    ":quit" | ":exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                match interp.eval_expression(line) {
                    Ok(result) => {
                        // Don't print unspecified values (e.g., from set!)
                        if !matches!(result, Value::Unspecified) {
                            println!("{result}");
                        }
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }

            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
}

fn print_help() {
    println!("Cellar REPL commands:");
    println!("  :help  - Show this help message");
    println!("  :env   - Show current global bindings");
    println!("  :store - Show the number of allocated store cells");
    println!("  :quit  - Exit the interpreter");
    println!("  :exit  - Exit the interpreter");
    println!("  Ctrl+C - Exit the interpreter");
    println!();
    println!("Language:");
    println!("  Numbers: 42, -5, #x1A");
    println!("  Booleans: #t / #f");
    println!("  Strings: \"hello\"");
    println!("  Quoted data: 'foo, '(1 2 3)");
    println!("  Arithmetic: +, -, *, /");
    println!("  Comparison: =, <, >, <=, >=, eq?");
    println!("  Lists: cons, car, cdr, list, pair?, null?");
    println!("  Special forms: if, lambda, let, set!, quote");
    println!("  Top-level definitions: (define name expr)");
    println!();
    println!("Examples:");
    println!("  (define make-counter (lambda () (let ((n 0)) (lambda () (set! n (+ n 1)) n))))");
    println!("  (define c (make-counter))");
    println!("  (c)");
    println!();
}

fn print_environment(interp: &Interpreter) {
    let bindings = interp.global_bindings();

    if bindings.is_empty() {
        println!("No global bindings yet.");
        return;
    }

    println!("Global bindings ({} total):", bindings.len());
    for (name, value) in bindings {
        println!("  {name} = {value}");
    }
}

use std::process;

mod app;
mod args;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("rep: {}", err);
            process::exit(2);
        }
    }
}

fn run() -> rep::Result<i32> {
    let grep = args::parse()?;
    let results = grep.execute(false)?;
    // In quiet mode a match trumps any recorded error.
    if grep.is_quiet() && results.any_match() {
        return Ok(0);
    }
    Ok(results.exit_code())
}

use std::io::Read;
use std::path::Path;

use super::{connect, fail, print_rectangles};

/// Posts a query document and prints what the server stored.
pub fn execute(file: &Path, addr: Option<String>) {
    let body = match read_query(file) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Error: could not read {}: {e}", file.display());
            std::process::exit(1);
        }
    };

    let matches = connect(addr).submit(body).unwrap_or_else(|e| fail(&e));

    println!("{} overlapping rectangle(s) stored.", matches.len());
    print_rectangles(&matches);
}

fn read_query(file: &Path) -> std::io::Result<Vec<u8>> {
    if file.as_os_str() == "-" {
        let mut body = Vec::new();
        std::io::stdin().read_to_end(&mut body)?;
        return Ok(body);
    }
    std::fs::read(file)
}

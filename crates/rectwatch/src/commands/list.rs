use super::{connect, fail, print_rectangles};

/// Prints every stored rectangle, one JSON object per line.
pub fn execute(addr: Option<String>) {
    let rectangles = connect(addr).list().unwrap_or_else(|e| fail(&e));

    if rectangles.is_empty() {
        println!("No rectangles stored.");
    }
    print_rectangles(&rectangles);
}

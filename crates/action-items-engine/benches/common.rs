// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> String {
    let mut content = String::new();
    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str("Paragraph with some content that is not an action item.\n");
        content.push_str(&format!("// follow up on section {section}\n"));
        content.push_str("- an ordinary bullet\n\n");
    }
    content
}

#[allow(dead_code)]
pub fn generate_prose(lines: usize) -> String {
    "A line of prose without any markers in it at all.\n".repeat(lines)
}

//! Walk-through: encode a payload, damage the code the way a sloppy
//! transcriber might, and recover the original bytes.
//!
//! Run with `cargo run --example transcribe`.

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x} ")).collect()
}

fn main() {
    let data = b"Hello, world!\0";
    println!("Data:      {}", hex(data));

    let code = multicode::encode(data, 8);
    println!("Encoded:   {code}");

    let recovered = multicode::decode(&code, data.len(), 8);
    println!("Recovered: {}", hex(&recovered));

    // Transpose two character pairs and lose one character entirely.
    let mut chars: Vec<char> = code.chars().collect();
    chars.swap(0, 1);
    chars.swap(18, 19);
    chars[52] = ' ';
    let damaged: String = chars.into_iter().collect();
    println!("Damaged:   {damaged}");

    match multicode::try_decode(&damaged, data.len(), 8) {
        Ok(bytes) => println!("Recovered: {}", hex(&bytes)),
        Err(err) => println!("Failed: {err}"),
    }
}

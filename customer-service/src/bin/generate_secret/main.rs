use auth::SigningSecret;

/// Prints a fresh signing secret for `JWT__SECRET`.
fn main() {
    println!("{}", SigningSecret::generate().to_hex());
}

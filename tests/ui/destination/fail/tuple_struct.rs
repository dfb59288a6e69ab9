use qrm::Destination;

#[derive(Default, Destination)]
struct Pair(i64, String);

fn main() {}

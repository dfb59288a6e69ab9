use qrm::Destination;

#[derive(Default, Destination)]
struct Reading {
    #[qrm(primary_key)]
    id: i64,
    #[qrm(nested, scalar)] level: i32,
}

fn main() {}

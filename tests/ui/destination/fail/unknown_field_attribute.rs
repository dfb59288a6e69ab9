use qrm::Destination;

#[derive(Default, Destination)]
struct Account {
    #[qrm(index)]
    id: i64,
}

fn main() {}

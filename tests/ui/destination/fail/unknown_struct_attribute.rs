use qrm::Destination;

#[derive(Default, Destination)]
#[qrm(table = "accounts")]
struct Account {
    #[qrm(primary_key)]
    id: i64,
}

fn main() {}

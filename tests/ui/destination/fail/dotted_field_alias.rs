use qrm::Destination;

#[derive(Default, Destination)]
struct Account {
    #[qrm(primary_key, alias = "from.id")]
    id: i64,
}

fn main() {}

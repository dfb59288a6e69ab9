use qrm::Destination;

#[derive(Default, Destination)]
#[qrm(alias = "")]
struct Account {
    #[qrm(primary_key)]
    id: i64,
}

fn main() {}

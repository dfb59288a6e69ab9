use qrm::Destination;

#[derive(Destination)]
enum Status {
    Open,
    Closed,
}

fn main() {}

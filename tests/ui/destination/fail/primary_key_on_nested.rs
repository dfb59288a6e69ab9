use qrm::Destination;

#[derive(Default, Destination)]
struct Post {
    #[qrm(primary_key)]
    id: i64,
    #[qrm(primary_key)] author: Author,
}

#[derive(Default, Destination)]
struct Author {
    #[qrm(primary_key)]
    id: i64,
}

fn main() {}

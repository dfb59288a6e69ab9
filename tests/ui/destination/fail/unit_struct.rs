use qrm::Destination;

#[derive(Default, Destination)]
struct Marker;

fn main() {}

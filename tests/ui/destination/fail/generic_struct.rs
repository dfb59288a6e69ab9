use qrm::Destination;

#[derive(Default, Destination)]
struct Wrapper<T> {
    value: T,
}

fn main() {}

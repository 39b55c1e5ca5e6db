use crwa_derive::api_model;

#[api_model]
struct ServiceInfo {
    service_name: String,
    version: String,
}

fn main() {
    let info = ServiceInfo { service_name: "crwa".to_owned(), version: "1".to_owned() };
    let _ = format!("{info:?}");
}

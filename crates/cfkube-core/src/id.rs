pub fn generate_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}

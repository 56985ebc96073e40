use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata for `booking-relay --version` and the health endpoint
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}

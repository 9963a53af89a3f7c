//! Sample app: register a credential against the software authenticator,
//! then authenticate and print what each verifier concluded.

use crosskey::client::{Client, ClientError, MemoryStore, SoftAuthenticator};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    env_logger::init();

    let authenticator = SoftAuthenticator::new("https://future.example.com");
    let mut client = Client::new(authenticator, MemoryStore::new(), "future.example.com")
        .rp_name("Future Example");

    // Registration: the authenticator creates the key pair, we decode and
    // persist the 65-byte public key from the attestation object.
    let credential = client.register("wendy").await?;
    println!("registered credential: {}", credential.id);
    println!("public key: {:?}", credential.public_key);

    // Authentication: a fresh challenge, one assertion, two independent
    // verifiers on identical input.
    for attempt in 1..=3 {
        let outcome = client.authenticate(&credential.id).await?;
        println!(
            "attempt {attempt}: local={} reference={} (agreed: {})",
            outcome.local,
            outcome.reference,
            outcome.agreed(),
        );
        assert!(outcome.verified());
    }

    Ok(())
}

use sha2::{Digest, Sha256};

pub const CHECKSUM_SEPARATOR: &str = "###";

/// Signs a gateway request: the hex SHA-256 of `payload + endpoint + salt_key`,
/// suffixed with `###` and the salt index that identifies which key was used.
pub fn checksum(payload: &str, endpoint: &str, salt_key: &str, salt_index: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(endpoint.as_bytes());
    hasher.update(salt_key.as_bytes());
    format!("{:x}{CHECKSUM_SEPARATOR}{salt_index}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT_KEY: &str = "099eb0cd-02cf-4e2a-8aca-3e6c6aff0399";

    #[test]
    fn test_pay_checksum() {
        let signed = checksum("eyJhIjoxfQ==", "/pg/v1/pay", SALT_KEY, "1");
        assert_eq!(
            signed,
            "f4ab9a7e787f9f269ba7785ac3161dbab890bf73adb4d31605caef8b50662351###1"
        );
    }

    #[test]
    fn test_status_checksum_signs_endpoint_only() {
        let signed = checksum(
            "",
            "/pg/v1/status/PGTESTPAYUAT/ORD1700000000000",
            SALT_KEY,
            "2",
        );
        assert_eq!(
            signed,
            "45a44e23bb7255abd16dc18f290ed5795c2ca289f6f29783d063d5d50be50236###2"
        );
    }

    #[test]
    fn test_checksum_depends_on_salt_key() {
        let a = checksum("body", "/pg/v1/pay", "key-a", "1");
        let b = checksum("body", "/pg/v1/pay", "key-b", "1");
        assert_ne!(a, b);
        assert!(a.ends_with("###1"));
        assert_eq!(a.split(CHECKSUM_SEPARATOR).next().unwrap().len(), 64);
    }
}

use alloy_primitives::{bytes::BufMut, keccak256, B256};

/// Computes the shnarf of a blob from the shnarf of its parent.
///
/// The shnarf is the keccak256 hash of the parent shnarf, the snark hash of the blob, the final
/// state root hash and the evaluation point and claim of the blob polynomial, each encoded as a
/// 32 bytes word.
pub fn compute_shnarf(
    parent_shnarf: B256,
    snark_hash: B256,
    final_state_root_hash: B256,
    x: B256,
    y: B256,
) -> B256 {
    let mut buf = Vec::with_capacity(5 * 32);
    buf.put_slice(parent_shnarf.as_slice());
    buf.put_slice(snark_hash.as_slice());
    buf.put_slice(final_state_root_hash.as_slice());
    buf.put_slice(x.as_slice());
    buf.put_slice(y.as_slice());

    keccak256(buf)
}

/// Computes the evaluation point of the blob polynomial from the snark hash and the data hash.
pub fn compute_evaluation_point(snark_hash: B256, data_hash: B256) -> B256 {
    let mut buf = Vec::with_capacity(2 * 32);
    buf.put_slice(snark_hash.as_slice());
    buf.put_slice(data_hash.as_slice());

    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shnarf_is_keccak_of_concatenated_words() {
        let words = [
            B256::repeat_byte(1),
            B256::repeat_byte(2),
            B256::repeat_byte(3),
            B256::repeat_byte(4),
            B256::repeat_byte(5),
        ];
        let expected = keccak256(words.concat());

        assert_eq!(compute_shnarf(words[0], words[1], words[2], words[3], words[4]), expected);
    }

    #[test]
    fn test_shnarf_depends_on_parent() {
        let (snark, root, x, y) =
            (B256::repeat_byte(2), B256::repeat_byte(3), B256::repeat_byte(4), B256::repeat_byte(5));
        assert_ne!(
            compute_shnarf(B256::ZERO, snark, root, x, y),
            compute_shnarf(B256::repeat_byte(1), snark, root, x, y)
        );
    }

    #[test]
    fn test_evaluation_point() {
        let (snark, data) = (B256::repeat_byte(0xaa), B256::repeat_byte(0xbb));
        assert_eq!(compute_evaluation_point(snark, data), keccak256([snark, data].concat()));
    }
}

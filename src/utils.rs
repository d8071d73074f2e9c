/// Trial-division primality test.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Smallest prime `>= lower_bound` (and at least 2).
pub fn next_prime(lower_bound: usize) -> usize {
    let mut n = lower_bound.max(2);
    if n > 2 && n % 2 == 0 {
        n += 1;
    }
    while !is_prime(n) {
        n += 2;
    }
    n
}

/// Bucket of a 64-bit key in a table of `buckets` chains.
pub fn bucket_of(key: u64, buckets: usize) -> usize {
    (key % buckets as u64) as usize
}

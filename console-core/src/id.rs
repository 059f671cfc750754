/// Generate a client-side id for a new resource: `<prefix>_<time>_<random>`.
///
/// The time part is the current unix time in milliseconds, base36; the random
/// part is nine base36 characters taken from a v4 UUID.
pub fn generate_id(prefix: &str) -> String {
    let prefix = if prefix.is_empty() { "id" } else { prefix };
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u128;
    let random = to_base36(uuid::Uuid::new_v4().as_u128());
    let random = format!("{random:0>9}");
    format!("{prefix}_{}_{}", to_base36(millis), &random[random.len() - 9..])
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

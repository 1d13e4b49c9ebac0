/// Reduces a pre-rendered snippet to readable text.
///
/// Tags are dropped and the handful of entities the generator emits are decoded. Unknown
/// entities are left as written.
pub fn plain_text(snippet: &str) -> String {
	let mut out = String::with_capacity(snippet.len());
	let mut rest = snippet;

	while let Some(c) = rest.chars().next() {
		match c {
			'<' => match rest.find('>') {
				Some(end) => rest = &rest[end + 1..],
				None => {
					out.push_str(rest);
					break;
				}
			},
			'&' => {
				let decoded = ENTITIES.iter().find(|(entity, _)| rest.starts_with(*entity));
				match decoded {
					Some((entity, ch)) => {
						out.push(*ch);
						rest = &rest[entity.len()..];
					}
					None => {
						out.push('&');
						rest = &rest[1..];
					}
				}
			}
			_ => {
				out.push(c);
				rest = &rest[c.len_utf8()..];
			}
		}
	}
	out
}

const ENTITIES: &[(&str, char)] = &[
	("&lt;", '<'),
	("&gt;", '>'),
	("&amp;", '&'),
	("&quot;", '"'),
	("&#39;", '\''),
	("&#x27;", '\''),
	("&nbsp;", ' '),
];

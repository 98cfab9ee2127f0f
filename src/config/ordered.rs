//! JSON 对象按书写顺序读写，用于顺序有意义的表（物品角色、建造消耗）
//!
//! 用法：`#[serde(with = "crate::config::ordered")]` 标在 `Vec<(String, V)>` 字段上。

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct PairsVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs: Vec<(String, V)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                // 重复的键：后写的覆盖先写的，位置不变
                match pairs.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => pairs.push((key, value)),
                }
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Table {
        #[serde(with = "crate::config::ordered")]
        entries: Vec<(String, u32)>,
    }

    #[test]
    fn keeps_declaration_order() {
        let table: Table = serde_json::from_str(r#"{ "entries": { "zeta": 1, "alpha": 2, "mid": 3 } }"#).unwrap();
        assert_eq!(
            table.entries,
            vec![("zeta".to_string(), 1), ("alpha".to_string(), 2), ("mid".to_string(), 3)]
        );
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"entries":{"zeta":1,"alpha":2,"mid":3}}"#
        );
    }

    #[test]
    fn duplicate_key_keeps_first_position() {
        let table: Table = serde_json::from_str(r#"{ "entries": { "b": 1, "a": 2, "b": 3 } }"#).unwrap();
        assert_eq!(table.entries, vec![("b".to_string(), 3), ("a".to_string(), 2)]);
    }
}

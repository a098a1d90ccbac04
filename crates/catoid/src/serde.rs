use crate::{Iid, Oid, Oids};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

impl Serialize for Iid {
    /// Serializes as the base-36 text form.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Iid {
    /// Deserializes from base-36 text or a raw unsigned integer.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IidVisitor;

        impl de::Visitor<'_> for IidVisitor {
            type Value = Iid;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a base-36 string or an unsigned integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Iid::decode(v).map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Iid::new(v))
            }
        }

        deserializer.deserialize_any(IidVisitor)
    }
}

impl Serialize for Oid {
    /// Serializes as the prefixed text form; the zero value is the empty
    /// string.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Oid {
    /// Deserializes from the prefixed or bare text form, or a raw
    /// unsigned integer. The empty string is the zero value; malformed
    /// text is a typed error.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OidVisitor;

        impl de::Visitor<'_> for OidVisitor {
            type Value = Oid;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("an oid string or an unsigned integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v.is_empty() {
                    return Ok(Oid::ZERO);
                }
                Oid::parse(v).map(|(_, oid)| oid).map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Oid::new(v))
            }
        }

        deserializer.deserialize_any(OidVisitor)
    }
}

impl Serialize for Oids {
    /// Serializes as an array of oid strings.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Oids {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Oid>::deserialize(deserializer).map(Oids)
    }
}

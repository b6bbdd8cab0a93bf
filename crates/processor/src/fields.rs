use crate::config::MarkerTarget;
use crate::docs::extract_doc;
use crate::resolver::Resolver;
use refdoc_model::{Field, TypeId};
use refdoc_source::{Member, RawType};

/// Serialization directive of a member: the name override and the inline flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Directive {
    name: Option<String>,
    inline: bool,
}

impl Directive {
    fn parse(member: &Member) -> Self {
        let Some(tag) = member.serialization_tag() else {
            return Self::default();
        };

        let mut args = tag.split(',');
        let name = args
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let inline = args.any(|option| option == "inline");
        Self { name, inline }
    }
}

impl<'a> Resolver<'a> {
    /// Resolve the members of a record into fields of `record`.
    ///
    /// Member types resolve at `depth`, the depth of the record body.
    pub(crate) fn collect_fields(
        &mut self,
        record: TypeId,
        record_identifier: &str,
        members: &'a [Member],
        depth: usize,
    ) {
        log::debug!("Processing struct fields of {record_identifier}");

        for member in members {
            let directive = Directive::parse(member);
            let embedded = member.is_embedded();
            let unnamed_embedding = embedded && directive.name.is_none();
            let mut name = directive.name.unwrap_or_else(|| member.name.clone());

            if matches!(member.ty, RawType::Invalid) {
                log::debug!("Failed to determine type of field {record_identifier}.{name}");
                continue;
            }

            log::debug!("Loading field type {record_identifier}.{name}");
            let type_ref = self.resolve(&member.ty, depth);
            // only records have members to splice in
            let inlined = directive.inline
                || (unnamed_embedding && self.registry.underlying_record(type_ref).is_some());
            if name.is_empty() {
                name.clone_from(&self.registry[type_ref].name);
            }

            if self.config.should_ignore_field(record_identifier, &name) {
                log::debug!("Skipping excluded field {record_identifier}.{name}");
                continue;
            }

            let mut field = Field::new(name, type_ref);
            field.doc = extract_doc(&member.doc, self.config.use_raw_docstring);
            field.embedded = embedded;
            field.inlined = inlined;
            field.markers = self.markers.filter(MarkerTarget::Field, &member.markers);

            self.registry[record].fields.push(field);
            self.references.add_reference(&self.registry, record, type_ref);
        }
    }
}

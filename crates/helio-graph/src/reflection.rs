//! Static resource declarations made by passes

/// Direction of a declared resource
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum ResourceKind {
    /// Read by the pass, written by someone else
    Input,
    /// Written by the pass
    Output,
}

/// A single image a pass reads or writes
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceField {
    pub name: String,
    pub description: String,
    pub kind: ResourceKind,
    /// Required format, `None` if the pass accepts any float format
    pub format: Option<wgpu::TextureFormat>,
    /// Usages the graph must allocate the image with
    pub usage: wgpu::TextureUsages,
}

impl ResourceField {
    fn new(name: &str, description: &str, kind: ResourceKind) -> Self {
        let usage = match kind {
            ResourceKind::Input => wgpu::TextureUsages::TEXTURE_BINDING,
            ResourceKind::Output => wgpu::TextureUsages::RENDER_ATTACHMENT,
        };

        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            format: None,
            usage,
        }
    }

    /// Require a specific format
    pub fn format(&mut self, format: wgpu::TextureFormat) -> &mut Self {
        self.format = Some(format);
        self
    }

    /// Add usages on top of the ones implied by the direction
    pub fn usage(&mut self, usage: wgpu::TextureUsages) -> &mut Self {
        self.usage |= usage;
        self
    }
}

/// Builder for declaring pass resources
#[derive(Debug, Default, Clone)]
pub struct PassReflection {
    fields: Vec<ResourceField>,
}

impl PassReflection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that this pass reads an image
    pub fn add_input(&mut self, name: &str, description: &str) -> &mut ResourceField {
        self.add(ResourceField::new(name, description, ResourceKind::Input))
    }

    /// Declare that this pass writes an image
    pub fn add_output(&mut self, name: &str, description: &str) -> &mut ResourceField {
        self.add(ResourceField::new(name, description, ResourceKind::Output))
    }

    // A second declaration under the same name replaces the first
    fn add(&mut self, field: ResourceField) -> &mut ResourceField {
        let index = match self.fields.iter().position(|f| f.name == field.name) {
            Some(index) => {
                log::warn!("Resource '{}' declared twice, keeping the last one", field.name);
                self.fields[index] = field;
                index
            }
            None => {
                self.fields.push(field);
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }

    pub fn field(&self, name: &str) -> Option<&ResourceField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[ResourceField] {
        &self.fields
    }

    pub fn inputs(&self) -> impl Iterator<Item = &ResourceField> {
        self.fields.iter().filter(|f| f.kind == ResourceKind::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &ResourceField> {
        self.fields.iter().filter(|f| f.kind == ResourceKind::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_implies_usage() {
        let mut reflection = PassReflection::new();
        reflection.add_input("color", "Scene color");
        reflection.add_output("out", "Result").usage(wgpu::TextureUsages::COPY_SRC);

        let input = reflection.field("color").unwrap();
        assert_eq!(input.kind, ResourceKind::Input);
        assert_eq!(input.usage, wgpu::TextureUsages::TEXTURE_BINDING);

        let output = reflection.field("out").unwrap();
        assert_eq!(output.kind, ResourceKind::Output);
        assert_eq!(
            output.usage,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC
        );
    }

    #[test]
    fn redeclaring_replaces() {
        let mut reflection = PassReflection::new();
        reflection.add_input("image", "first");
        reflection
            .add_output("image", "second")
            .format(wgpu::TextureFormat::Rgba16Float);

        assert_eq!(reflection.fields().len(), 1);
        assert_eq!(reflection.inputs().count(), 0);
        let field = reflection.field("image").unwrap();
        assert_eq!(field.description, "second");
        assert_eq!(field.format, Some(wgpu::TextureFormat::Rgba16Float));
    }
}

use crate::{
    create::{CreationError, StrategyKind},
    marker::{Marker, Markers},
    member::{
        Constructor, FactoryMethod, InstanceFactoryMethod, Introspect, OperationMember,
        ParameterMember, PropertyMember, TypeMembers,
    },
    reference::{AccessError, CollectionAccess, CollectionValue, FieldReference, Invoker, MethodReference},
    types::Typed,
    value::{FieldValue, Instance, Value},
};
use std::{any::Any, fmt, marker::PhantomData, sync::Arc};

///
/// TypeBuilder
///
/// Registration surface handed to `Introspect::introspect`. Member
/// registrations return the member's marker bag so markers can be chained
/// right after the declaration.
///

pub struct TypeBuilder<T> {
    members: TypeMembers,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Introspect> TypeBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            members: TypeMembers::new(T::type_token()),
            _marker: PhantomData,
        }
    }

    pub(crate) fn finish(self) -> TypeMembers {
        self.members
    }

    /// Type-level markers.
    pub const fn markers(&mut self) -> &mut Markers {
        &mut self.members.markers
    }

    pub fn marker<M: Marker>(&mut self, marker: M) -> &mut Self {
        self.members.markers.mark(marker);
        self
    }

    pub fn property<F>(
        &mut self,
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut Markers
    where
        F: FieldValue + Typed,
    {
        let reference = FieldReference::new(name, get, get_mut);

        self.push_property(PropertyMember::new(name, T::type_token(), Arc::new(reference)))
    }

    pub fn read_only<F>(&mut self, name: &str, get: fn(&T) -> &F) -> &mut Markers
    where
        F: FieldValue + Typed,
    {
        let reference = FieldReference::read_only(name, get);

        self.push_property(PropertyMember::new(name, T::type_token(), Arc::new(reference)))
    }

    /// Collection-valued property; carries the collection capability.
    pub fn collection<C>(
        &mut self,
        name: &str,
        get: fn(&T) -> &C,
        get_mut: fn(&mut T) -> &mut C,
    ) -> &mut Markers
    where
        C: CollectionValue,
    {
        let reference = FieldReference::new(name, get, get_mut);
        let member = PropertyMember::new(name, T::type_token(), Arc::new(reference))
            .with_collection(Arc::new(CollectionAccess::<C>::new()));

        self.push_property(member)
    }

    pub fn operation<R, F>(
        &mut self,
        name: &str,
        parameters: Vec<ParameterMember>,
        invoke: F,
    ) -> &mut Markers
    where
        R: FieldValue + Typed,
        F: Fn(&mut T, &[Value]) -> Result<R, AccessError> + Send + Sync + 'static,
    {
        let invoker: Invoker<T> = Arc::new(move |target: &mut T, args: &[Value]| {
            invoke(target, args).map(|result| result.to_value())
        });
        let reference = MethodReference::new(name, invoker);
        let member = OperationMember::new(
            name,
            T::type_token(),
            parameters,
            R::type_token(),
            Arc::new(reference),
        );

        let index = self.members.operations.len();
        self.members.operations.push(member);

        self.members.operations[index].markers_mut()
    }

    pub fn constructor(&mut self, construct: fn() -> T) -> &mut Self {
        self.members.constructor = Some(Constructor::new(T::type_token(), move || {
            Ok(Instance::new(construct()))
        }));
        self
    }

    /// Constructor that can fail; the message is wrapped as a creation error.
    pub fn try_constructor<F>(&mut self, construct: F) -> &mut Self
    where
        F: Fn() -> Result<T, String> + Send + Sync + 'static,
    {
        let token = T::type_token();

        self.members.constructor = Some(Constructor::new(token, move || {
            construct()
                .map(Instance::new)
                .map_err(|message| CreationError::failed(StrategyKind::Constructor, &token, message))
        }));
        self
    }

    /// Static no-argument factory method returning `R`.
    pub fn factory_method<R, F>(&mut self, name: &str, invoke: F) -> &mut Self
    where
        R: Typed + Clone + fmt::Debug + PartialEq + Send + Sync,
        F: Fn() -> Result<R, String> + Send + Sync + 'static,
    {
        let token = T::type_token();
        let method = FactoryMethod::new(name, token, R::type_token(), move || {
            invoke()
                .map(Instance::new)
                .map_err(|message| CreationError::failed(StrategyKind::FactoryMethod, &token, message))
        });

        self.members.factory_methods.push(method);
        self
    }

    /// Factory method invoked on an instance of `T`, returning `R`.
    pub fn instance_factory_method<R, F>(&mut self, name: &str, invoke: F) -> &mut Self
    where
        R: Typed + Clone + fmt::Debug + PartialEq + Send + Sync,
        F: Fn(&T) -> Result<R, String> + Send + Sync + 'static,
    {
        let token = T::type_token();
        let method = InstanceFactoryMethod::new(
            name,
            token,
            R::type_token(),
            move |factory: &dyn Any| {
                let factory = factory.downcast_ref::<T>().ok_or_else(|| {
                    CreationError::failed(
                        StrategyKind::FactoryInstance,
                        &token,
                        "factory object has the wrong type",
                    )
                })?;

                invoke(factory).map(Instance::new).map_err(|message| {
                    CreationError::failed(StrategyKind::FactoryInstance, &token, message)
                })
            },
        );

        self.members.instance_factory_methods.push(method);
        self
    }

    fn push_property(&mut self, member: PropertyMember) -> &mut Markers {
        let index = self.members.properties.len();
        self.members.properties.push(member);

        self.members.properties[index].markers_mut()
    }
}
